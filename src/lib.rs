//! Bitcoin balance and transaction status queries with node → explorer failover

pub mod cli;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod keys;
pub mod resilience;
pub mod rpc;
pub mod scanner;
pub mod service;
pub mod types;

pub use service::QueryService;
