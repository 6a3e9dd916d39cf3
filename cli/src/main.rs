// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Pact CLI
//!
//! The `pact` binary runs the agreement server and talks to it.
//!
//! ## Commands
//!
//! - `pact serve` - Run the HTTP API server
//! - `pact agreement create|join|show|public|update|chat|checklist|agree` - Client operations
//! - `pact config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pact_cli::commands::{self, AgreementCommand, ConfigCommand};
use pact_cli::server;
use pact_core::domain::server_config::ServerConfig;
use pact_sdk::PactClient;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Pact - small shared agreements between people
#[derive(Parser)]
#[command(name = "pact")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PACT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP API host (default: 127.0.0.1)
    #[arg(long, global = true, env = "PACT_HOST")]
    host: Option<String>,

    /// HTTP API port (default: 8000)
    #[arg(long, global = true, env = "PACT_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PACT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    #[command(name = "serve")]
    Serve,

    /// Work with agreements on a running server
    #[command(name = "agreement")]
    Agreement {
        #[command(subcommand)]
        command: AgreementCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let mut config = ServerConfig::load_or_default(cli.config)
                .context("Failed to load configuration")?;
            if let Some(host) = cli.host {
                config.spec.network.bind_address = host;
            }
            if let Some(port) = cli.port {
                config.spec.network.port = port;
            }
            if let Some(level) = cli.log_level {
                config.spec.observability.logging.level = level;
            }

            let logging = &config.spec.observability.logging;
            init_logging(&logging.level, &logging.format)?;
            server::start_server(config).await
        }
        Commands::Agreement { command } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            let client = PactClient::new(server_url(cli.host.as_deref(), cli.port));
            commands::agreement::handle_command(command, &client).await
        }
        Commands::Config { command } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::config::handle_command(command, cli.config).await
        }
    }
}

/// Base URL of the server a client command talks to.
fn server_url(host: Option<&str>, port: Option<u16>) -> String {
    let host = match host {
        None | Some("") | Some("0.0.0.0") => DEFAULT_HOST,
        Some(h) => h,
    };
    format!("http://{}:{}", host, port.unwrap_or(DEFAULT_PORT))
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from([
            "pact",
            "serve",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--config",
            "/tmp/pact.yaml",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Serve));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pact.yaml")));
    }

    #[test]
    fn test_parse_agreement_create() {
        let cli = Cli::try_parse_from([
            "pact",
            "agreement",
            "create",
            "--title",
            "Split rent",
            "--name",
            "Alice",
        ])
        .unwrap();

        match cli.command {
            Commands::Agreement {
                command:
                    AgreementCommand::Create {
                        title,
                        description,
                        name,
                    },
            } => {
                assert_eq!(title, "Split rent");
                assert_eq!(description, None);
                assert_eq!(name, "Alice");
            }
            _ => panic!("expected agreement create"),
        }
    }

    #[test]
    fn test_agreement_id_must_be_uuid() {
        let result = Cli::try_parse_from([
            "pact",
            "agreement",
            "agree",
            "not-a-uuid",
            "--name",
            "Alice",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["pact"]).is_err());
    }

    #[test]
    fn test_server_url() {
        assert_eq!(server_url(None, None), "http://127.0.0.1:8000");
        assert_eq!(server_url(Some("0.0.0.0"), Some(9000)), "http://127.0.0.1:9000");
        assert_eq!(server_url(Some("pact.local"), None), "http://pact.local:8000");
    }
}
