// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use pact_core::domain::server_config::ServerConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate a configuration file with default values
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./pact-config.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output } => generate(output),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ServerConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in ServerConfig::candidate_paths().iter().enumerate() {
            let marker = if path.exists() {
                "found".green()
            } else {
                "missing".dimmed()
            };
            println!("  {}. {} ({})", i + 2, path.display(), marker);
        }
        println!();
    }

    let spec = &config.spec;
    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Network:".bold());
    println!("  Listen: {}", config.listen_addr());
    println!();

    println!("{}", "Store:".bold());
    println!("  Invite code attempts: {}", spec.store.invite_code_attempts);
    println!();

    println!("{}", "Observability:".bold());
    println!(
        "  Logging: level={} format={}",
        spec.observability.logging.level, spec.observability.logging.format
    );
    if spec.observability.metrics.enabled {
        println!("  Metrics: enabled on port {}", spec.observability.metrics.port);
    } else {
        println!("  Metrics: {}", "disabled".dimmed());
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config =
        ServerConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf) -> Result<()> {
    if output.exists() {
        anyhow::bail!("Refusing to overwrite existing file {}", output.display());
    }

    ServerConfig::default()
        .to_yaml_file(&output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
