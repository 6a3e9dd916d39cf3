// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server entry point for `pact serve`

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use pact_core::{
    application::agreement_service::StandardAgreementService,
    domain::server_config::ServerConfig,
    infrastructure::{
        invite_code::RandomInviteCodeGenerator, repositories::InMemoryAgreementRepository,
    },
    presentation::api,
};

/// Build the service graph from `config` and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(name = %config.metadata.name, "Pact server starting");

    let metrics = &config.spec.observability.metrics;
    if metrics.enabled {
        let addr: SocketAddr = format!("{}:{}", config.spec.network.bind_address, metrics.port)
            .parse()
            .context("Invalid metrics listen address")?;
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", addr);
    }

    let repository = Arc::new(InMemoryAgreementRepository::new());
    let invite_codes = Arc::new(RandomInviteCodeGenerator::new());
    let service = Arc::new(
        StandardAgreementService::new(repository, invite_codes)
            .with_invite_code_attempts(config.spec.store.invite_code_attempts),
    );

    let app = api::app(service);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
