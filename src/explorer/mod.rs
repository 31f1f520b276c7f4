//! Block explorer integration (fallback source)
//!
//! Talks to a BlockCypher-compatible HTTP API. Non-2xx responses and bodies
//! that do not match the expected JSON are both explorer errors; neither is
//! retried here.

pub mod client;
pub mod types;

pub use client::ExplorerClient;
pub use types::{ExplorerAddress, ExplorerTx};
