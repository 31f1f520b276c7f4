//! Circuit breaker with primary/fallback routing.
//!
//! # States
//! - Closed: calls go to the primary source, retried with backoff
//! - Open: primary assumed down, calls go straight to the fallback
//!
//! # State Transitions
//! ```text
//! Closed → Open:   primary failed 1 + max_retries times in one call
//! Open   → Closed: reset timer fires open_timeout after the transition
//! ```
//!
//! There is no half-open probe. Once the timer fires the next call runs the
//! full retry sequence against the primary again, so a primary that is still
//! broken costs one retry-and-backoff round per `open_timeout` window on top
//! of the fallback call.

use crate::config::BreakerConfig;
use crate::resilience::backoff::backoff_delay;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// A data source bound into a breaker at construction
pub type SourceFn<K, V, E> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<V, E>> + Send + Sync>;

/// Immutable retry and recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Retries after the first failed primary call
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub open_timeout: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            open_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_backoff: config.base_backoff(),
            open_timeout: config.open_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
}

/// State shared with the reset timer task
#[derive(Default)]
struct Shared {
    open: AtomicBool,
    reset_timer: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn cancel_timer(&self) {
        let mut timer = self
            .reset_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

/// Routes each call to a primary source (with retries) or a fallback source
pub struct CircuitBreaker<K, V, E> {
    name: &'static str,
    policy: BreakerPolicy,
    primary: SourceFn<K, V, E>,
    fallback: SourceFn<K, V, E>,
    shared: Arc<Shared>,
}

impl<K, V, E> CircuitBreaker<K, V, E>
where
    K: Clone + Send + 'static,
    V: Send + 'static,
    E: Display + Send + 'static,
{
    pub fn new<P, PFut, F, FFut>(
        name: &'static str,
        policy: BreakerPolicy,
        primary: P,
        fallback: F,
    ) -> Self
    where
        P: Fn(K) -> PFut + Send + Sync + 'static,
        PFut: Future<Output = Result<V, E>> + Send + 'static,
        F: Fn(K) -> FFut + Send + Sync + 'static,
        FFut: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self {
            name,
            policy,
            primary: Arc::new(move |key| primary(key).boxed()),
            fallback: Arc::new(move |key| fallback(key).boxed()),
            shared: Arc::new(Shared::default()),
        }
    }

    /// Answer `key` from the primary or, when it is unavailable, the fallback.
    ///
    /// Fallback results are returned as-is and never retried.
    pub async fn call(&self, key: K) -> Result<V, E> {
        if self.is_open() {
            debug!("Breaker {} open, using fallback", self.name);
            return (self.fallback)(key).await;
        }

        let mut attempt = 0;
        loop {
            match (self.primary)(key.clone()).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            "Breaker {}: primary succeeded after {} attempts",
                            self.name,
                            attempt + 1
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        "Breaker {}: primary attempt {} failed: {}",
                        self.name,
                        attempt + 1,
                        e
                    );
                    if attempt >= self.policy.max_retries {
                        break;
                    }
                    sleep(backoff_delay(self.policy.base_backoff, attempt)).await;
                    attempt += 1;
                }
            }
        }

        self.trip();
        (self.fallback)(key).await
    }

    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::Acquire)
    }

    pub fn state(&self) -> BreakerState {
        if self.is_open() {
            BreakerState::Open
        } else {
            BreakerState::Closed
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> &BreakerPolicy {
        &self.policy
    }

    /// Cancel a pending reset timer. The breaker keeps its current state.
    pub fn shutdown(&self) {
        self.shared.cancel_timer();
    }

    /// Closed → Open, arming exactly one reset timer per transition
    fn trip(&self) {
        if self
            .shared
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Breaker {} already open", self.name);
            return;
        }

        warn!(
            "Breaker {} opened for {:?} after {} failed attempts",
            self.name,
            self.policy.open_timeout,
            self.policy.max_retries + 1
        );

        let shared = Arc::clone(&self.shared);
        let open_timeout = self.policy.open_timeout;
        let name = self.name;
        let handle = tokio::spawn(async move {
            sleep(open_timeout).await;
            shared.open.store(false, Ordering::Release);
            info!("Breaker {} closed, primary will be retried", name);
        });

        let mut timer = self
            .shared
            .reset_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The previous timer already fired; it is what closed the breaker.
        *timer = Some(handle);
    }
}

impl<K, V, E> Drop for CircuitBreaker<K, V, E> {
    fn drop(&mut self) {
        self.shared.cancel_timer();
    }
}
