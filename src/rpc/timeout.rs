//! Per-call deadline for blocking node operations
//!
//! Every node call runs on the blocking pool; this wraps the common pattern of
//! `spawn_blocking` inside `tokio::time::timeout` while keeping the inner
//! result intact for the caller.

use crate::errors::RpcResult;
use std::time::Duration;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

/// Execute a blocking RPC operation with timeout wrapper
///
/// # Returns
/// `Result<Result<RpcResult<T>, JoinError>, Elapsed>`
/// - Outer Result: Timeout result (Err = timeout elapsed)
/// - Middle Result: spawn_blocking result (Err = task panic/failure)
/// - Inner RpcResult<T>: RPC operation result
///
/// A timed-out operation keeps running on the blocking pool until the
/// underlying HTTP call returns; only the caller stops waiting for it.
pub async fn execute_with_timeout<T, F>(
    timeout_seconds: u64,
    operation: F,
) -> Result<Result<RpcResult<T>, JoinError>, Elapsed>
where
    T: Send + 'static,
    F: FnOnce() -> RpcResult<T> + Send + 'static,
{
    timeout(
        Duration::from_secs(timeout_seconds),
        tokio::task::spawn_blocking(operation),
    )
    .await
}
