use crate::cli::commands::ConnectionArgs;
use crate::errors::AppResult;
use crate::service::QueryService;
use clap::Args;
use tracing::info;

/// Scan recent blocks for deposits to an address, node only
#[derive(Args)]
pub struct ScanCommand {
    /// Address to scan for
    pub address: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ScanCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.connection.resolve()?;
        let service = QueryService::connect(&config)?;

        let summary = service.scanner().scan(&self.address).await?;
        info!(
            "Scanned {} blocks, {} deposits",
            summary.blocks_scanned,
            summary.deposits.len()
        );

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
