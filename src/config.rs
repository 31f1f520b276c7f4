use crate::errors::{AppError, AppResult};
use bitcoin::Network;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `BTC_QUERY_BITCOIN_RPC__URL`
pub const ENV_PREFIX: &str = "BTC_QUERY";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bitcoin_rpc: BitcoinRpcConfig,
    pub explorer: ExplorerConfig,
    pub scanner: ScannerConfig,
    pub breaker: BreakerConfig,
}

/// Bitcoin Core node connection (primary source)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BitcoinRpcConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub timeout_seconds: u64,
    pub concurrent_requests: usize,
}

impl Default for BitcoinRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8332".to_string(),
            username: "bitcoin".to_string(),
            password: "password".to_string(),
            timeout_seconds: 30,
            concurrent_requests: 10,
        }
    }
}

/// Public block explorer (fallback source)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.blockcypher.com/v1/btc/main".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Block-range scan used for node-backed balances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub block_depth: u64,
    pub network: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            block_depth: 10,
            network: "bitcoin".to_string(),
        }
    }
}

impl ScannerConfig {
    pub fn network(&self) -> AppResult<Network> {
        Network::from_str(&self.network)
            .map_err(|e| AppError::Config(format!("Unknown network '{}': {}", self.network, e)))
    }
}

/// Retry and open-state policy shared by both circuit breakers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub open_timeout_seconds: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff_ms: 100,
            open_timeout_seconds: 10,
        }
    }
}

impl BreakerConfig {
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_seconds)
    }
}

impl AppConfig {
    /// Load configuration from config.toml (if present) and environment variables.
    /// Environment variables take precedence over file configuration.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file; the file must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Get config for CLI defaults, falling back to built-in values
    pub fn get_defaults() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> AppResult<()> {
        self.scanner.network()?;

        reqwest::Url::parse(&self.explorer.base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid explorer base URL '{}': {}",
                self.explorer.base_url, e
            ))
        })?;

        if self.bitcoin_rpc.url.is_empty() {
            return Err(AppError::Config("Bitcoin RPC URL is empty".to_string()));
        }
        if self.bitcoin_rpc.timeout_seconds == 0 || self.explorer.timeout_seconds == 0 {
            return Err(AppError::Config("Timeouts must be at least one second".to_string()));
        }
        if self.bitcoin_rpc.concurrent_requests == 0 {
            return Err(AppError::Config(
                "bitcoin_rpc.concurrent_requests must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
