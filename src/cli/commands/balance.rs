use crate::cli::commands::ConnectionArgs;
use crate::errors::AppResult;
use crate::service::QueryService;
use clap::Args;
use serde_json::json;
use tracing::error;

/// Balance of an address, node first with explorer failover
#[derive(Args)]
pub struct BalanceCommand {
    /// Address to look up
    pub address: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl BalanceCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.connection.resolve()?;
        let service = QueryService::connect(&config)?;

        let result = service.check_balance(&self.address).await;
        let health = service.status();
        service.shutdown();

        match result {
            Ok(balance) => {
                let output = json!({
                    "address": self.address,
                    "balance_sat": balance.to_sat(),
                    "balance_btc": balance.to_btc(),
                    "health": health,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }
            Err(e) => {
                error!("Balance lookup for {} failed (health: {}): {}", self.address, health, e);
                Err(e.into())
            }
        }
    }
}
