//! Configuration management for Energy Fetcher
//!
//! This module provides multi-source configuration loading with zero-config
//! defaults. Every field of every section may be omitted from the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::ClientConfig;
use crate::constants::{api, env, files, http, logging, pipeline};
use crate::errors::{ConfigError, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Data service client settings
    pub client: ClientConfigToml,
    /// Data service settings
    pub server: ServerConfigToml,
    /// Pipeline defaults for the CLI tools
    pub pipeline: PipelineConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Base URL of the data service
    pub base_url: String,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Pause between page fetches in milliseconds
    pub page_delay_ms: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            tcp_nodelay: true,
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            page_delay_ms: api::PAGE_DELAY.as_millis() as u64,
        }
    }
}

/// TOML-friendly server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfigToml {
    /// Address to listen on
    pub listen: String,
    /// Dataset file served by the list and detail views
    pub data_file: PathBuf,
    /// Records per page
    pub page_size: usize,
}

impl Default for ServerConfigToml {
    fn default() -> Self {
        Self {
            listen: api::DEFAULT_BIND_ADDR.to_string(),
            data_file: PathBuf::from(api::DEFAULT_DATASET_PATH),
            page_size: api::PAGE_SIZE,
        }
    }
}

/// TOML-friendly pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfigToml {
    /// States used to categorize the local dataset
    pub split_states: Vec<String>,
    /// States queried by api-split
    pub api_states: Vec<String>,
    /// Lower sqft bound used by api-split
    pub min_sqft: i64,
    /// Root directory for generated artifacts
    pub output_root: PathBuf,
}

impl Default for PipelineConfigToml {
    fn default() -> Self {
        Self {
            split_states: to_strings(pipeline::DEFAULT_SPLIT_STATES),
            api_states: to_strings(pipeline::DEFAULT_API_STATES),
            min_sqft: pipeline::DEFAULT_MIN_SQFT,
            output_root: PathBuf::from(files::DEFAULT_OUTPUT_ROOT),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Runtime server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen: String,
    pub data_file: PathBuf,
    pub page_size: usize,
}

/// Runtime pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub split_states: Vec<String>,
    pub api_states: Vec<String>,
    pub min_sqft: i64,
    pub output_root: PathBuf,
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, ServerConfig, PipelineConfig) {
        (
            self.client.to_runtime_config(),
            self.server.to_runtime_config(),
            self.pipeline.to_runtime_config(),
        )
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Explicit config file (must exist)
    /// 3. `ENERGY_FETCHER_CONFIG`, then `./energy-fetcher.toml`, then the
    ///    user config directory
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path }.into());
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = Vec::new();
        if let Ok(path) = std::env::var(env::CONFIG_PATH) {
            search_paths.push(PathBuf::from(path));
        }
        search_paths.push(PathBuf::from("./energy-fetcher.toml"));
        if let Some(path) = Self::get_default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    fn get_default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("energy-fetcher").join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::from)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.page_size".to_string(),
                value: "0".to_string(),
                reason: "Page size must be at least 1".to_string(),
            }
            .into());
        }
        if self.pipeline.min_sqft < 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.min_sqft".to_string(),
                value: self.pipeline.min_sqft.to_string(),
                reason: "Floor area cannot be negative".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }
}

impl ServerConfigToml {
    /// Convert to runtime ServerConfig
    pub fn to_runtime_config(&self) -> ServerConfig {
        ServerConfig {
            listen: self.listen.clone(),
            data_file: self.data_file.clone(),
            page_size: self.page_size,
        }
    }
}

impl PipelineConfigToml {
    /// Convert to runtime PipelineConfig
    pub fn to_runtime_config(&self) -> PipelineConfig {
        PipelineConfig {
            split_states: self.split_states.clone(),
            api_states: self.api_states.clone(),
            min_sqft: self.min_sqft,
            output_root: self.output_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.client.base_url, "http://localhost:8080");
        assert_eq!(config.client.page_delay_ms, 100);
        assert_eq!(config.server.page_size, 12);
        assert_eq!(config.pipeline.split_states, vec!["NY", "NJ", "PA"]);
        assert_eq!(config.pipeline.api_states, vec!["NY", "NJ"]);
        assert_eq!(config.pipeline.min_sqft, 30_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_runtime_conversion() {
        let (client, server, pipeline) = AppConfig::default().to_runtime_config();
        assert_eq!(client.page_delay, Duration::from_millis(100));
        assert_eq!(server.listen, "0.0.0.0:8080");
        assert_eq!(pipeline.output_root, PathBuf::from("project_data"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_partial_config_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("energy-fetcher.toml");

        let test_config = r#"
[client]
base_url = "http://127.0.0.1:9000"
page_delay_ms = 0

[pipeline]
api_states = ["PA"]

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();
        assert_eq!(config.client.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.client.page_delay_ms, 0);
        assert_eq!(config.pipeline.api_states, vec!["PA"]);
        assert_eq!(config.logging.level, "debug");

        // Unspecified values fall back to defaults
        assert_eq!(config.pipeline.min_sqft, 30_000);
        assert_eq!(config.server.page_size, 12);
        assert!(config.client.tcp_nodelay);
    }

    #[tokio::test]
    async fn test_invalid_config_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");

        tokio::fs::write(&config_path, "[server]\npage_size = 0\n")
            .await
            .unwrap();
        let result = AppConfig::load(Some(config_path.clone())).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));

        tokio::fs::write(&config_path, "[server\n").await.unwrap();
        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidFormat(_)))
        ));
    }
}
