//! Query façade: balance and transaction status with node → explorer failover
//!
//! Each query kind gets its own [`CircuitBreaker`] built here from a
//! node-backed primary and an explorer-backed fallback. The two breakers are
//! independent; [`QueryService::status`] folds them into one health signal.

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult, QueryError, QueryResult, RpcError, RpcResult};
use crate::explorer::ExplorerClient;
use crate::keys;
use crate::resilience::{BreakerPolicy, CircuitBreaker};
use crate::rpc::{BitcoinRpcClient, NodeTransaction};
use crate::scanner::{parse_address, BlockScanner};
use crate::types::{ServiceStatus, TxStatus};
use bitcoin::secp256k1::{PublicKey, SecretKey};
use bitcoin::{Amount, Network, SignedAmount, Txid};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub struct QueryService {
    rpc: Arc<BitcoinRpcClient>,
    explorer: Arc<ExplorerClient>,
    scanner: BlockScanner,
    network: Network,
    balance_breaker: CircuitBreaker<String, Amount, QueryError>,
    status_breaker: CircuitBreaker<String, TxStatus, QueryError>,
}

impl QueryService {
    /// Build the service from configuration. Invalid settings are fatal.
    pub fn connect(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let rpc = BitcoinRpcClient::new(&config.bitcoin_rpc)
            .map_err(|e| AppError::Config(format!("Bitcoin RPC client: {}", e)))?;
        let explorer = ExplorerClient::new(&config.explorer)
            .map_err(|e| AppError::Config(format!("Explorer client: {}", e)))?;

        Self::from_parts(rpc, explorer, config)
    }

    /// Build the service around already-constructed collaborators
    pub fn from_parts(
        rpc: BitcoinRpcClient,
        explorer: ExplorerClient,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let network = config.scanner.network()?;
        let policy = BreakerPolicy::from(&config.breaker);

        let rpc = Arc::new(rpc);
        let explorer = Arc::new(explorer);
        let scanner = BlockScanner::new(Arc::clone(&rpc), network, config.scanner.block_depth);

        let balance_breaker: CircuitBreaker<String, Amount, QueryError> = {
            let scanner = scanner.clone();
            let explorer = Arc::clone(&explorer);
            CircuitBreaker::new(
                "balance",
                policy,
                move |address: String| {
                    let scanner = scanner.clone();
                    async move { Ok::<_, QueryError>(scanner.balance_of(&address).await?) }
                },
                move |address: String| {
                    let explorer = Arc::clone(&explorer);
                    async move { Ok::<_, QueryError>(explorer.address_balance(&address).await?) }
                },
            )
        };

        let status_breaker: CircuitBreaker<String, TxStatus, QueryError> = {
            let rpc = Arc::clone(&rpc);
            let explorer = Arc::clone(&explorer);
            CircuitBreaker::new(
                "tx_status",
                policy,
                move |txid: String| {
                    let rpc = Arc::clone(&rpc);
                    async move {
                        let transaction = rpc.transaction(&txid).await?;
                        Ok::<_, QueryError>(node_tx_status(transaction)?)
                    }
                },
                move |txid: String| {
                    let explorer = Arc::clone(&explorer);
                    async move { Ok::<_, QueryError>(explorer.tx_status(&txid).await?) }
                },
            )
        };

        info!(
            "Query service ready: node {}, explorer {}, depth {}, network {}",
            rpc.host(),
            explorer.base_url(),
            config.scanner.block_depth,
            network
        );

        Ok(Self {
            rpc,
            explorer,
            scanner,
            network,
            balance_breaker,
            status_breaker,
        })
    }

    /// Balance of `address` in satoshis
    pub async fn check_balance(&self, address: &str) -> QueryResult<Amount> {
        let address = parse_address(address, self.network).map_err(|e| QueryError::InvalidKey {
            key: address.to_string(),
            reason: e.to_string(),
        })?;
        self.balance_breaker.call(address.to_string()).await
    }

    pub async fn check_tx_status(&self, txid: &str) -> QueryResult<TxStatus> {
        let txid = Txid::from_str(txid).map_err(|e| QueryError::InvalidKey {
            key: txid.to_string(),
            reason: e.to_string(),
        })?;
        self.status_breaker.call(txid.to_string()).await
    }

    /// `Down` while either breaker is open
    pub fn status(&self) -> ServiceStatus {
        if self.balance_breaker.is_open() || self.status_breaker.is_open() {
            ServiceStatus::Down
        } else {
            ServiceStatus::Up
        }
    }

    pub fn balance_breaker(&self) -> &CircuitBreaker<String, Amount, QueryError> {
        &self.balance_breaker
    }

    pub fn status_breaker(&self) -> &CircuitBreaker<String, TxStatus, QueryError> {
        &self.status_breaker
    }

    pub fn scanner(&self) -> &BlockScanner {
        &self.scanner
    }

    pub fn explorer(&self) -> &ExplorerClient {
        &self.explorer
    }

    pub fn rpc(&self) -> &BitcoinRpcClient {
        &self.rpc
    }

    /// Node URL the primary source talks to
    pub fn node_host(&self) -> &str {
        self.rpc.host()
    }

    pub fn generate_address(&self, public_key: &PublicKey) -> String {
        keys::address_from_pubkey(public_key, self.network).to_string()
    }

    pub fn generate_key_pair(&self) -> (PublicKey, SecretKey) {
        keys::generate_key_pair()
    }

    /// Cancel both breakers' pending reset timers
    pub fn shutdown(&self) {
        self.balance_breaker.shutdown();
        self.status_breaker.shutdown();
    }
}

/// Map `gettransaction` onto [`TxStatus`], converting BTC amounts to satoshis
fn node_tx_status(transaction: NodeTransaction) -> RpcResult<TxStatus> {
    let to_sat = |field: &str, btc: f64| {
        SignedAmount::from_btc(btc)
            .map(|amount| amount.to_sat())
            .map_err(|e| RpcError::InvalidResponse(format!("Bad {} {}: {}", field, btc, e)))
    };

    let amount = to_sat("amount", transaction.amount)?;
    let fee = match transaction.fee {
        Some(fee) => to_sat("fee", fee)?.abs(),
        None => 0,
    };

    Ok(TxStatus {
        amount,
        confirmations: transaction.confirmations,
        fee,
        block_hash: transaction.blockhash,
        block_index: transaction.blockindex,
        hash: transaction.txid,
        confirmed: transaction.blocktime,
        received: transaction.timereceived,
    })
}
