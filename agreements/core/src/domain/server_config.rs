// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Server Configuration Types
//
// Defines the configuration schema for a pact server, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Network bind settings
// - Store tuning (invite code generation)
// - Logging and metrics settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "pact.dev/v1";
pub const KIND: &str = "ServerConfig";

/// Top-level Kubernetes-style server configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfigManifest {
    /// API version (must be "pact.dev/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ServerConfig")
    pub kind: String,

    /// Server metadata (name, labels)
    pub metadata: ManifestMetadata,

    /// Server configuration specification
    #[serde(default)]
    pub spec: ServerConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable server name
    pub name: String,

    /// Optional: Labels for categorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Server configuration specification (content under spec:)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigSpec {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How many fresh invite codes to try before giving up on a collision streak
    #[serde(default = "default_invite_code_attempts")]
    pub invite_code_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            invite_code_attempts: default_invite_code_attempts(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus exposition
    #[serde(default)]
    pub enabled: bool,

    /// Metrics endpoint port
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_invite_code_attempts() -> u32 {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for ServerConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "pact-server".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                labels: None,
            },
            spec: ServerConfigSpec::default(),
        }
    }
}

/// Alias used by the binary
pub type ServerConfig = ServerConfigManifest;

impl ServerConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Paths checked by [`Self::discover_config`], in precedence order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("PACT_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("./pact-config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pact").join("config.yaml"));
        }
        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/pact/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Pact\\config.yaml"));
        paths
    }

    /// Discover configuration file using precedence order
    /// 1. PACT_CONFIG_PATH environment variable
    /// 2. ./pact-config.yaml (working directory)
    /// 3. ~/.pact/config.yaml (user home)
    /// 4. /etc/pact/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with precedence: explicit path, discovery, defaults
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("PACT_HOST") {
            if !host.is_empty() {
                self.spec.network.bind_address = host;
            }
        }

        if let Ok(val) = std::env::var("PACT_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.spec.network.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PACT_PORT value: {}", val),
            }
        }

        if let Ok(level) = std::env::var("PACT_LOG_LEVEL") {
            if !level.is_empty() {
                self.spec.observability.logging.level = level;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.network.bind_address.is_empty() {
            anyhow::bail!("spec.network.bind_address cannot be empty");
        }

        if self.spec.network.port == 0 {
            anyhow::bail!("spec.network.port must be non-zero");
        }

        if self.spec.store.invite_code_attempts == 0 {
            anyhow::bail!("spec.store.invite_code_attempts must be at least 1");
        }

        let format = self.spec.observability.logging.format.as_str();
        if format != "text" && format != "json" {
            anyhow::bail!(
                "Invalid spec.observability.logging.format: '{}'. Must be 'text' or 'json'",
                format
            );
        }

        let metrics = &self.spec.observability.metrics;
        if metrics.enabled && metrics.port == self.spec.network.port {
            anyhow::bail!("Metrics port {} collides with the HTTP API port", metrics.port);
        }

        Ok(())
    }

    /// Socket address the HTTP API listens on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.spec.network.bind_address, self.spec.network.port)
    }
}
