//! CLI subcommands and the connection flags they share

use crate::config::AppConfig;
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;

pub mod balance;
pub mod keygen;
pub mod scan;
pub mod test_rpc;
pub mod tx_status;

/// Connection overrides applied on top of config.toml and the environment
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bitcoin RPC URL (overrides config.toml)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Bitcoin RPC username (overrides config.toml)
    #[arg(long)]
    pub rpc_username: Option<String>,

    /// Bitcoin RPC password (overrides config.toml)
    #[arg(long)]
    pub rpc_password: Option<String>,

    /// Block explorer base URL (overrides config.toml)
    #[arg(long)]
    pub explorer_url: Option<String>,

    /// Number of blocks below the tip to scan (overrides config.toml)
    #[arg(long)]
    pub depth: Option<u64>,
}

impl ConnectionArgs {
    /// Load configuration and apply CLI overrides
    pub fn resolve(&self) -> AppResult<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };

        if let Some(url) = &self.rpc_url {
            config.bitcoin_rpc.url = url.clone();
        }
        if let Some(username) = &self.rpc_username {
            config.bitcoin_rpc.username = username.clone();
        }
        if let Some(password) = &self.rpc_password {
            config.bitcoin_rpc.password = password.clone();
        }
        if let Some(explorer_url) = &self.explorer_url {
            config.explorer.base_url = explorer_url.clone();
        }
        if let Some(depth) = self.depth {
            config.scanner.block_depth = depth;
        }

        config.validate()?;
        Ok(config)
    }
}
