//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Query:
//!     → circuit_breaker.rs (closed: primary with retries, open: fallback)
//!     → backoff.rs (delay between primary retries)
//!     → exhausted retries: open, arm reset timer, answer from fallback
//! ```
//!
//! Per-call timeouts belong to the source collaborators (`rpc`, `explorer`);
//! the breaker imposes no overall deadline beyond the sum of its backoffs.

pub mod backoff;
pub mod circuit_breaker;

pub use backoff::backoff_delay;
pub use circuit_breaker::{BreakerPolicy, BreakerState, CircuitBreaker, SourceFn};
