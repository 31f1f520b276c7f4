//! Wire shapes of the explorer API, mapped onto crate types

use crate::errors::ExplorerResult;
use crate::explorer::client::to_satoshis;
use crate::types::TxStatus;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /addrs/{address}`; only `final_balance` is required
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerAddress {
    #[serde(default)]
    pub address: Option<String>,
    pub final_balance: f64,
    #[serde(default)]
    pub n_tx: Option<u64>,
}

/// `GET /txs/{txid}`
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerTx {
    pub total: f64,
    pub fees: f64,
    pub confirmations: i64,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_index: Option<i64>,
    pub hash: String,
    #[serde(default)]
    pub confirmed: Option<DateTime<Utc>>,
    pub received: DateTime<Utc>,
}

impl ExplorerTx {
    pub fn into_status(self) -> ExplorerResult<TxStatus> {
        let amount = to_satoshis("total", self.total)?;
        let fee = to_satoshis("fees", self.fees)?;

        Ok(TxStatus {
            amount: i64::try_from(amount).unwrap_or(i64::MAX),
            confirmations: self.confirmations,
            fee: i64::try_from(fee).unwrap_or(i64::MAX),
            block_hash: self.block_hash,
            block_index: self.block_index,
            hash: self.hash,
            confirmed: self.confirmed.map(|at| at.timestamp()),
            received: self.received.timestamp(),
        })
    }
}
