//! Narrow view of a Bitcoin Core node
//!
//! The scanner and the query service only ever need four calls from the node.
//! [`BlockSource`] captures exactly those, so tests can swap in an in-memory
//! chain and the production path can use `corepc-client`.

use crate::config::BitcoinRpcConfig;
use crate::errors::{RpcError, RpcResult};
use bitcoin::{Block, BlockHash, Txid};
use corepc_client::client_sync::{v28::Client, Auth};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

/// Blocking node operations, shared read-only across scan workers
pub trait BlockSource: Send + Sync {
    /// Height of the current chain tip
    fn block_count(&self) -> RpcResult<u64>;

    /// Hash of the block at `height` on the active chain
    fn block_hash(&self, height: u64) -> RpcResult<BlockHash>;

    /// Fully decoded block
    fn block(&self, hash: &BlockHash) -> RpcResult<Block>;

    /// Wallet view of a transaction (`gettransaction`)
    fn transaction(&self, txid: &Txid) -> RpcResult<NodeTransaction>;

    /// Cheap liveness probe
    fn ping(&self) -> RpcResult<()> {
        self.block_count().map(|_| ())
    }
}

/// Subset of the `gettransaction` result; amounts are in BTC as the node reports them
#[derive(Debug, Clone, Deserialize)]
pub struct NodeTransaction {
    pub amount: f64,
    #[serde(default)]
    pub fee: Option<f64>,
    pub confirmations: i64,
    #[serde(default)]
    pub blockhash: Option<String>,
    #[serde(default)]
    pub blockindex: Option<i64>,
    #[serde(default)]
    pub blocktime: Option<i64>,
    pub txid: String,
    pub time: i64,
    pub timereceived: i64,
}

/// [`BlockSource`] backed by Bitcoin Core JSON-RPC
pub struct CoreRpcSource {
    client: Client,
}

impl CoreRpcSource {
    pub fn new(config: &BitcoinRpcConfig) -> RpcResult<Self> {
        let auth = Auth::UserPass(config.username.clone(), config.password.clone());
        let client = Client::new_with_auth(&config.url, auth).map_err(|e| {
            RpcError::ConnectionFailed(format!("Failed to create Bitcoin RPC client: {}", e))
        })?;

        Ok(Self { client })
    }

    fn call<T>(&self, method: &str, args: &[serde_json::Value]) -> RpcResult<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        self.client
            .call(method, args)
            .map_err(|e| RpcError::CallFailed {
                method: method.to_string(),
                message: e.to_string(),
            })
    }
}

impl BlockSource for CoreRpcSource {
    fn block_count(&self) -> RpcResult<u64> {
        self.call("getblockcount", &[])
    }

    fn block_hash(&self, height: u64) -> RpcResult<BlockHash> {
        let hash: String = self.call("getblockhash", &[json!(height)])?;
        BlockHash::from_str(&hash)
            .map_err(|e| RpcError::InvalidResponse(format!("Bad block hash '{}': {}", hash, e)))
    }

    fn block(&self, hash: &BlockHash) -> RpcResult<Block> {
        let raw: String = self.call("getblock", &[json!(hash.to_string()), json!(0)])?;
        decode_block_hex(&raw)
    }

    fn transaction(&self, txid: &Txid) -> RpcResult<NodeTransaction> {
        self.call("gettransaction", &[json!(txid.to_string())])
    }

    fn ping(&self) -> RpcResult<()> {
        let info: serde_json::Value = self.call("getblockchaininfo", &[])?;
        tracing::debug!(
            "Bitcoin Core connection test successful - chain: {}, blocks: {}",
            info["chain"],
            info["blocks"]
        );
        Ok(())
    }
}

/// Deserialise a hex-encoded block as returned by `getblock <hash> 0`
pub fn decode_block_hex(raw: &str) -> RpcResult<Block> {
    let bytes = hex::decode(raw.trim()).map_err(|e| {
        RpcError::DeserialisationFailed(format!("Failed to decode raw block hex: {}", e))
    })?;

    bitcoin::consensus::deserialize(&bytes).map_err(|e| {
        RpcError::DeserialisationFailed(format!("Failed to deserialise raw block: {}", e))
    })
}
