use crate::config::BitcoinRpcConfig;
use crate::errors::{RpcError, RpcResult};
use crate::rpc::{execute_with_timeout, BlockSource, CoreRpcSource, NodeTransaction};
use bitcoin::{Block, BlockHash, Txid};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Async Bitcoin RPC client: every call runs on the blocking pool with a
/// per-call timeout and a shared concurrency limit
pub struct BitcoinRpcClient {
    source: Arc<dyn BlockSource>,
    host: String,
    timeout_seconds: u64,
    semaphore: Arc<Semaphore>,
    error_count: Arc<AtomicU64>,
    concurrent_requests: usize,
}

impl BitcoinRpcClient {
    /// Create a client talking to Bitcoin Core. No request is made here;
    /// use [`test_connection`](Self::test_connection) to probe the node.
    pub fn new(config: &BitcoinRpcConfig) -> RpcResult<Self> {
        let source = CoreRpcSource::new(config)?;
        info!("Bitcoin RPC client configured for {}", config.url);
        Ok(Self::with_source(Arc::new(source), config))
    }

    /// Create a client over any [`BlockSource`]
    pub fn with_source(source: Arc<dyn BlockSource>, config: &BitcoinRpcConfig) -> Self {
        let concurrent_requests = config.concurrent_requests.max(1);
        Self {
            source,
            host: config.url.clone(),
            timeout_seconds: config.timeout_seconds,
            semaphore: Arc::new(Semaphore::new(concurrent_requests)),
            error_count: Arc::new(AtomicU64::new(0)),
            concurrent_requests,
        }
    }

    pub async fn block_count(&self) -> RpcResult<u64> {
        self.run("getblockcount", |source| source.block_count()).await
    }

    pub async fn block_hash(&self, height: u64) -> RpcResult<BlockHash> {
        self.run("getblockhash", move |source| source.block_hash(height))
            .await
    }

    pub async fn block(&self, hash: BlockHash) -> RpcResult<Block> {
        self.run("getblock", move |source| source.block(&hash)).await
    }

    /// Look up a wallet transaction by its hex txid
    pub async fn transaction(&self, txid: &str) -> RpcResult<NodeTransaction> {
        let hash = Txid::from_str(txid).map_err(|_| RpcError::InvalidTxid {
            txid: txid.to_string(),
        })?;
        self.run("gettransaction", move |source| source.transaction(&hash))
            .await
    }

    /// Test RPC connection
    pub async fn test_connection(&self) -> RpcResult<()> {
        self.run("connection_test", |source| source.ping()).await
    }

    /// Node URL this client was configured with
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the current error count from RPC operations
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Get the configured concurrent request limit
    pub fn get_concurrent_limit(&self) -> usize {
        self.concurrent_requests
    }

    async fn run<T, F>(&self, operation: &'static str, call: F) -> RpcResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn BlockSource) -> RpcResult<T> + Send + 'static,
    {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            RpcError::ConnectionFailed(format!("Failed to acquire semaphore: {}", e))
        })?;

        let source = Arc::clone(&self.source);
        let result = match execute_with_timeout(self.timeout_seconds, move || {
            call(source.as_ref())
        })
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(RpcError::CallFailed {
                method: "spawn_blocking".to_string(),
                message: format!("Task execution error for {}: {}", operation, e),
            }),
            Err(_) => Err(RpcError::Timeout {
                timeout_seconds: self.timeout_seconds,
                operation: operation.to_string(),
            }),
        };

        match &result {
            Ok(_) => debug!("RPC {} succeeded", operation),
            Err(e) => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
                warn!("RPC {} failed: {}", operation, e);
            }
        }

        result
    }
}
