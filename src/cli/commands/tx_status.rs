use crate::cli::commands::ConnectionArgs;
use crate::errors::AppResult;
use crate::service::QueryService;
use clap::Args;
use serde_json::json;
use tracing::error;

/// Status of a transaction, node first with explorer failover
#[derive(Args)]
pub struct TxStatusCommand {
    /// Transaction ID (hex)
    pub txid: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl TxStatusCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.connection.resolve()?;
        let service = QueryService::connect(&config)?;

        let result = service.check_tx_status(&self.txid).await;
        let health = service.status();
        service.shutdown();

        match result {
            Ok(status) => {
                let output = json!({
                    "status": status,
                    "health": health,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }
            Err(e) => {
                error!("Status lookup for {} failed (health: {}): {}", self.txid, health, e);
                Err(e.into())
            }
        }
    }
}
