//! Exponential backoff between primary retries

use std::time::Duration;

/// Delay before retry number `attempt` (starting at 0): `base * 2^attempt`
///
/// Saturates instead of overflowing for very large attempt counts.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}
