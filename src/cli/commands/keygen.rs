use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::keys;
use clap::Args;
use serde_json::json;

/// Generate a key pair and its P2PKH address
#[derive(Args)]
pub struct KeygenCommand {
    /// Network for the address (overrides config.toml)
    #[arg(long)]
    pub network: Option<String>,
}

impl KeygenCommand {
    pub fn run(&self) -> AppResult<()> {
        let mut scanner = AppConfig::get_defaults().scanner;
        if let Some(network) = &self.network {
            scanner.network = network.clone();
        }
        let network = scanner.network()?;

        let (public_key, secret_key) = keys::generate_key_pair();
        let address = keys::address_from_pubkey(&public_key, network);

        let output = json!({
            "public_key": public_key.to_string(),
            "secret_key": hex::encode(secret_key.secret_bytes()),
            "address": address.to_string(),
            "network": network.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
