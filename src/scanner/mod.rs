//! Node-backed balance computation by block-range scan
//!
//! The node exposes no address index, so a balance is the sum of deposits to
//! the address over the most recent `block_depth + 1` blocks. Every height is
//! one unit of work yielding exactly one `Result`; units run concurrently up
//! to the node client's limit and are folded as they complete. The first
//! failing unit ends the fold, and dropping the stream cancels the rest, so a
//! failed scan never yields a partial total.

pub mod deposits;

pub use deposits::extract_deposits;

use crate::errors::{RpcError, RpcResult};
use crate::rpc::BitcoinRpcClient;
use crate::types::{Deposit, ScanSummary};
use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, Network};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Parse `address` and require it to belong to `network`
pub fn parse_address(address: &str, network: Network) -> RpcResult<Address> {
    let invalid = |reason: String| RpcError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| invalid(e.to_string()))?
        .require_network(network)
        .map_err(|e| invalid(e.to_string()))
}

/// Scans recent blocks for deposits; holds no state between calls
#[derive(Clone)]
pub struct BlockScanner {
    rpc: Arc<BitcoinRpcClient>,
    network: Network,
    block_depth: u64,
}

impl BlockScanner {
    pub fn new(rpc: Arc<BitcoinRpcClient>, network: Network, block_depth: u64) -> Self {
        Self {
            rpc,
            network,
            block_depth,
        }
    }

    pub fn block_depth(&self) -> u64 {
        self.block_depth
    }

    /// Sum of deposits to `address` over the scanned range
    pub async fn balance_of(&self, address: &str) -> RpcResult<Amount> {
        self.scan(address)
            .await
            .map(|summary| Amount::from_sat(summary.total_sat))
    }

    /// Scan heights `[tip - block_depth, tip]` for deposits to `address`
    pub async fn scan(&self, address: &str) -> RpcResult<ScanSummary> {
        self.scan_with_depth(address, self.block_depth).await
    }

    pub async fn scan_with_depth(&self, address: &str, block_depth: u64) -> RpcResult<ScanSummary> {
        let target = parse_address(address, self.network)?.to_string();
        let tip = self.rpc.block_count().await?;
        let from_height = tip.saturating_sub(block_depth);

        info!(
            "Scanning blocks {}..={} for deposits to {}",
            from_height, tip, target
        );

        let rpc = &self.rpc;
        let network = self.network;
        let target_ref = target.as_str();

        let (mut deposits, total_sat) = stream::iter(from_height..=tip)
            .map(|height| async move {
                let hash = rpc.block_hash(height).await?;
                let block = rpc.block(hash).await?;
                let matching: Vec<Deposit> = extract_deposits(&block, height, network)
                    .into_iter()
                    .filter(|deposit| deposit.address == target_ref)
                    .collect();
                debug!(
                    "Block {} ({}) has {} deposits to {}",
                    height,
                    hash,
                    matching.len(),
                    target_ref
                );
                Ok::<_, RpcError>(matching)
            })
            .buffer_unordered(rpc.get_concurrent_limit())
            .try_fold(
                (Vec::new(), 0u64),
                |(mut all, total), found| async move {
                    let total = found
                        .iter()
                        .try_fold(total, |acc, deposit| acc.checked_add(deposit.amount_sat))
                        .ok_or_else(|| {
                            RpcError::InvalidResponse(
                                "Deposit total overflows u64 satoshis".to_string(),
                            )
                        })?;
                    all.extend(found);
                    Ok((all, total))
                },
            )
            .await?;

        deposits.sort_by(|a, b| {
            (a.height, &a.txid, a.vout).cmp(&(b.height, &b.txid, b.vout))
        });

        Ok(ScanSummary {
            address: target,
            from_height,
            to_height: tip,
            blocks_scanned: tip - from_height + 1,
            deposits,
            total_sat,
        })
    }
}
