use crate::cli::commands::ConnectionArgs;
use crate::errors::{AppError, AppResult};
use crate::rpc::BitcoinRpcClient;
use clap::Args;
use tracing::{error, info};

/// Test Bitcoin RPC connectivity
#[derive(Args)]
pub struct TestRpcCommand {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl TestRpcCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Testing Bitcoin RPC Connection ===");

        let rpc_config = self.connection.resolve()?.bitcoin_rpc;

        info!("Testing connection to: {}", rpc_config.url);
        info!("Username: {}", rpc_config.username);

        let client = BitcoinRpcClient::new(&rpc_config).map_err(|e| {
            error!("Failed to create RPC client: {}", e);
            AppError::Config(format!("RPC client creation failed: {}", e))
        })?;

        match client.test_connection().await {
            Ok(()) => {
                println!("Bitcoin RPC connection test PASSED");
                match client.block_count().await {
                    Ok(height) => println!("Chain tip height: {}", height),
                    Err(e) => println!("Connected, but getblockcount failed: {}", e),
                }
                Ok(())
            }
            Err(e) => {
                error!("RPC connection test failed: {}", e);
                println!("Bitcoin RPC connection test FAILED");
                println!("Error: {}", e);
                println!("\nTroubleshooting tips:");
                println!("1. Check that Bitcoin Core is running");
                println!("2. Verify the RPC URL is correct");
                println!("3. Ensure RPC credentials are valid");
                println!("4. Check that RPC server is enabled in bitcoin.conf");

                Err(AppError::Rpc(e))
            }
        }
    }
}
