//! Bitcoin Core RPC integration module
//!
//! This module provides the node side of every query:
//! - **Node** - the narrow [`BlockSource`] trait and its `corepc-client` implementation
//! - **Client** - async wrapper adding per-call timeouts and a concurrency limit
//! - **Timeout** - `spawn_blocking` + deadline helper

pub mod client;
pub mod node;
pub mod timeout;

// Re-export main types
pub use client::BitcoinRpcClient;
pub use node::{decode_block_hex, BlockSource, CoreRpcSource, NodeTransaction};
pub use timeout::execute_with_timeout;
