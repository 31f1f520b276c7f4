use btc_query::resilience::{BreakerPolicy, BreakerState, CircuitBreaker};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Tests for the circuit breaker state machine
///
/// All tests run on a paused clock, so backoff sleeps and the open timeout
/// elapse instantly while keeping their ordering.

const OPEN_TIMEOUT: Duration = Duration::from_secs(10);

struct Harness {
    breaker: CircuitBreaker<String, &'static str, String>,
    primary_calls: Arc<AtomicUsize>,
    fallback_calls: Arc<AtomicUsize>,
    primary_up: Arc<AtomicBool>,
}

fn harness(fallback_ok: bool) -> Harness {
    let primary_calls = Arc::new(AtomicUsize::new(0));
    let fallback_calls = Arc::new(AtomicUsize::new(0));
    let primary_up = Arc::new(AtomicBool::new(false));

    let breaker = {
        let primary_calls = Arc::clone(&primary_calls);
        let fallback_calls = Arc::clone(&fallback_calls);
        let primary_up = Arc::clone(&primary_up);
        CircuitBreaker::new(
            "harness",
            BreakerPolicy {
                max_retries: 3,
                base_backoff: Duration::from_millis(100),
                open_timeout: OPEN_TIMEOUT,
            },
            move |_key: String| {
                primary_calls.fetch_add(1, Ordering::SeqCst);
                let up = primary_up.load(Ordering::SeqCst);
                async move {
                    if up {
                        Ok("node")
                    } else {
                        Err("node unreachable".to_string())
                    }
                }
            },
            move |_key: String| {
                fallback_calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if fallback_ok {
                        Ok("explorer")
                    } else {
                        Err("explorer returned 503".to_string())
                    }
                }
            },
        )
    };

    Harness {
        breaker,
        primary_calls,
        fallback_calls,
        primary_up,
    }
}

#[tokio::test(start_paused = true)]
async fn test_healthy_primary_never_touches_fallback() {
    let h = harness(true);
    h.primary_up.store(true, Ordering::SeqCst);

    for _ in 0..5 {
        assert_eq!(h.breaker.call("addr".to_string()).await.unwrap(), "node");
    }
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 5);
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.breaker.state(), BreakerState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_open_breaker_skips_primary_until_timeout() {
    let h = harness(true);

    // Four failed primary attempts, then one fallback call
    assert_eq!(h.breaker.call("a".to_string()).await.unwrap(), "explorer");
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 4);
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 1);
    assert!(h.breaker.is_open());

    // Inside the open window only the fallback answers
    h.primary_up.store(true, Ordering::SeqCst);
    for _ in 0..3 {
        assert_eq!(h.breaker.call("b".to_string()).await.unwrap(), "explorer");
    }
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 4);
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 4);

    sleep(OPEN_TIMEOUT + Duration::from_millis(1)).await;
    assert_eq!(h.breaker.state(), BreakerState::Closed);

    // First call after the window goes back to the primary
    assert_eq!(h.breaker.call("c".to_string()).await.unwrap(), "node");
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 5);
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_error_returned_once_without_retry() {
    let h = harness(false);

    let err = h.breaker.call("a".to_string()).await.unwrap_err();
    assert_eq!(err, "explorer returned 503");
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 1);
    assert!(h.breaker.is_open());

    // Still open: fallback error passes straight through
    let err = h.breaker.call("b".to_string()).await.unwrap_err();
    assert_eq!(err, "explorer returned 503");
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_still_broken_primary_reopens_for_a_full_window() {
    let h = harness(true);

    h.breaker.call("a".to_string()).await.unwrap();
    sleep(OPEN_TIMEOUT + Duration::from_millis(1)).await;
    assert!(!h.breaker.is_open());

    // Probe: full retry sequence again (100 + 200 + 400 ms), then reopen
    let probe_started = Instant::now();
    assert_eq!(h.breaker.call("b".to_string()).await.unwrap(), "explorer");
    assert!(probe_started.elapsed() >= Duration::from_millis(700));
    assert_eq!(h.primary_calls.load(Ordering::SeqCst), 8);
    assert!(h.breaker.is_open());

    // The first episode's timer is gone; this episode lasts its own full window
    sleep(OPEN_TIMEOUT / 2).await;
    assert!(h.breaker.is_open());
    sleep(OPEN_TIMEOUT / 2 + Duration::from_millis(1)).await;
    assert!(!h.breaker.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_failures_open_once() {
    let h = Arc::new(harness(true));

    let calls: Vec<_> = (0..4)
        .map(|i| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.breaker.call(format!("k{}", i)).await })
        })
        .collect();
    for call in calls {
        assert_eq!(call.await.unwrap().unwrap(), "explorer");
    }
    assert!(h.breaker.is_open());
    assert_eq!(h.fallback_calls.load(Ordering::SeqCst), 4);

    sleep(OPEN_TIMEOUT + Duration::from_millis(1)).await;
    assert!(!h.breaker.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_opens_after_single_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let breaker: CircuitBreaker<u32, u32, String> = CircuitBreaker::new(
        "no-retry",
        BreakerPolicy {
            max_retries: 0,
            ..BreakerPolicy::default()
        },
        move |_key: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err("down".to_string()) }
        },
        |key: u32| async move { Ok(key * 2) },
    );

    assert_eq!(breaker.call(21).await.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(breaker.is_open());
}
