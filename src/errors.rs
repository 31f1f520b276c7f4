use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration issues (fatal at startup, never retried)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bitcoin RPC operations
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Block explorer operations
    #[error("Explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Query that exhausted both sources
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// RPC error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// Failed to establish connection to Bitcoin Core RPC server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// TXID string format is invalid (not valid hex or wrong length)
    #[error("Invalid txid: {txid}")]
    InvalidTxid { txid: String },

    /// Address does not parse or belongs to another network
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// RPC method call failed (covers network errors, authentication, etc.)
    #[error("RPC call failed: {method} - {message}")]
    CallFailed { method: String, message: String },

    /// Failed to deserialise RPC response data
    #[error("Deserialisation failed: {0}")]
    DeserialisationFailed(String),

    /// RPC request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// RPC returned unexpected or malformed response data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Block explorer error types
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Explorer answered with a non-2xx status
    #[error("Explorer returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Body was not the JSON shape we expect
    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    /// Amount that cannot be represented in satoshis
    #[error("Invalid amount {value} in field {field}")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Error carried through a circuit breaker: whichever source answered last
#[derive(Error, Debug)]
pub enum QueryError {
    /// Caller supplied a key that can never be answered; neither source is asked
    #[error("Invalid query key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("node: {0}")]
    Node(#[from] RpcError),

    #[error("explorer: {0}")]
    Explorer(#[from] ExplorerError),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Result type for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Result type for façade queries
pub type QueryResult<T> = Result<T, QueryError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
