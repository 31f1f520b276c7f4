//! Value types returned by the query façade and the block scanner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Incoming payment observed while scanning a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Destination address in canonical string form
    pub address: String,
    /// Amount paid to `address` by this output, in satoshis
    pub amount_sat: u64,
    /// Transaction that owns the output
    pub txid: String,
    pub vout: u32,
    /// Height of the block the output was found in
    pub height: u64,
}

/// Outcome of a block-range scan for one address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub address: String,
    pub from_height: u64,
    pub to_height: u64,
    pub blocks_scanned: u64,
    pub deposits: Vec<Deposit>,
    pub total_sat: u64,
}

/// Transaction status as reported by whichever source answered.
///
/// Amounts are normalised to satoshis on both paths. Timestamps are Unix
/// seconds; `confirmed` is absent while the transaction is unconfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatus {
    pub amount: i64,
    pub confirmations: i64,
    pub fee: i64,
    #[serde(rename = "blockhash")]
    pub block_hash: Option<String>,
    pub block_index: Option<i64>,
    pub hash: String,
    pub confirmed: Option<i64>,
    pub received: i64,
}

/// Coarse health signal across both breakers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Up,
    Down,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Up => "up",
            ServiceStatus::Down => "down",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
