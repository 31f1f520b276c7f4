use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Bitcoin balance and transaction status with node → explorer failover
#[derive(Parser)]
#[command(name = "btc-query")]
#[command(about = "Bitcoin balance and transaction status with node to explorer failover")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Balance of an address, in satoshis
    Balance(commands::balance::BalanceCommand),
    /// Status of a transaction
    TxStatus(commands::tx_status::TxStatusCommand),
    /// Scan recent blocks on the node for deposits to an address (no failover)
    Scan(commands::scan::ScanCommand),
    /// Generate a key pair and its address
    Keygen(commands::keygen::KeygenCommand),
    /// Test Bitcoin RPC connectivity
    TestRpc(commands::test_rpc::TestRpcCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "warn" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Balance(command) => command.run().await,
        Commands::TxStatus(command) => command.run().await,
        Commands::Scan(command) => command.run().await,
        Commands::Keygen(command) => command.run(),
        Commands::TestRpc(command) => command.run().await,
    }
}
