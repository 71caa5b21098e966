use super::*;
use rstest::rstest;
use std::sync::atomic::AtomicUsize;
use tokio::sync::Notify;

/// A clock that only moves when told to
#[derive(Clone)]
struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(1_000_000)),
        }
    }

    fn advance(&self, d: Duration) {
        self.millis
            .fetch_add(u64::try_from(d.as_millis()).unwrap(), Ordering::SeqCst);
    }

    fn time_getter(&self) -> TimeGetter {
        let millis = self.millis.clone();
        TimeGetter::new(Arc::new(move || {
            Time::from_duration_since_epoch(Duration::from_millis(millis.load(Ordering::SeqCst)))
        }))
    }
}

fn config(stale_time: Duration, retries: u32) -> QueryCacheConfig {
    QueryCacheConfig {
        stale_time,
        retries,
        retry_delay: Duration::ZERO,
    }
}

/// Counts calls and returns the call number
fn counting_fetcher(
    calls: &Arc<AtomicUsize>,
) -> impl Fn() -> futures::future::Ready<anyhow::Result<usize>> + Send + Sync + 'static {
    let calls = calls.clone();
    move || futures::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst) + 1))
}

#[tokio::test]
async fn concurrent_reads_share_one_request() {
    let cache = QueryCache::<u32, String>::new("test", config(Duration::ZERO, 0));
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let fetcher = {
        let calls = calls.clone();
        let gate = gate.clone();
        move || {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok("cameras".to_string())
            }
        }
    };

    let first = cache.fetch(1, fetcher.clone());
    let second = cache.fetch(1, fetcher.clone());
    let release = async {
        tokio::task::yield_now().await;
        gate.notify_one();
    };

    let (first, second, ()) = tokio::join!(first, second, release);
    assert_eq!(first.unwrap().as_str(), "cameras");
    assert_eq!(second.unwrap().as_str(), "cameras");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fresh_values_are_served_from_cache() {
    let clock = ManualClock::new();
    let cache = QueryCache::<&'static str, usize>::with_time_getter(
        "test",
        config(Duration::from_secs(30), 0),
        clock.time_getter(),
    );
    let calls = Arc::new(AtomicUsize::new(0));

    assert_eq!(*cache.fetch("tags", counting_fetcher(&calls)).await.unwrap(), 1);

    clock.advance(Duration::from_secs(29));
    assert_eq!(*cache.fetch("tags", counting_fetcher(&calls)).await.unwrap(), 1);

    clock.advance(Duration::from_secs(1));
    assert_eq!(*cache.fetch("tags", counting_fetcher(&calls)).await.unwrap(), 2);
    assert_eq!(cache.cached(&"tags").as_deref(), Some(&2));
}

#[tokio::test]
async fn zero_stale_time_always_refetches() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::ZERO, 0));
    let calls = Arc::new(AtomicUsize::new(0));

    for expected in 1..=3 {
        assert_eq!(*cache.fetch(0, counting_fetcher(&calls)).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn distinct_keys_are_fetched_separately() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::from_secs(60), 0));
    let calls = Arc::new(AtomicUsize::new(0));

    assert_eq!(*cache.fetch(1, counting_fetcher(&calls)).await.unwrap(), 1);
    assert_eq!(*cache.fetch(2, counting_fetcher(&calls)).await.unwrap(), 2);
    assert_eq!(*cache.fetch(1, counting_fetcher(&calls)).await.unwrap(), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::from_secs(60), 0));
    let calls = Arc::new(AtomicUsize::new(0));

    let failing = {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Err::<usize, _>(anyhow::anyhow!("connection refused")))
        }
    };

    let err = cache.fetch(5, failing.clone()).await.unwrap_err();
    assert_eq!(err.to_string(), "connection refused");
    assert!(cache.cached(&5).is_none());

    cache.fetch(5, failing).await.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn waiters_of_a_failed_request_get_the_same_error() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::ZERO, 0));
    let gate = Arc::new(Notify::new());

    let fetcher = {
        let gate = gate.clone();
        move || {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Err(anyhow::anyhow!("HTTP 503"))
            }
        }
    };

    let release = async {
        tokio::task::yield_now().await;
        gate.notify_one();
    };
    let (a, b, ()) = tokio::join!(
        cache.fetch(1, fetcher.clone()),
        cache.fetch(1, fetcher),
        release
    );

    let (QueryError::Fetch(a), QueryError::Fetch(b)) = (a.unwrap_err(), b.unwrap_err()) else {
        panic!("Expected fetch errors");
    };
    assert!(Arc::ptr_eq(&a, &b));
}

#[rstest]
#[case(0, 1, false)]
#[case(2, 3, true)]
#[case(3, 3, true)]
#[tokio::test]
async fn failed_fetches_are_retried(
    #[case] retry_count: u32,
    #[case] expected_calls: usize,
    #[case] succeeds: bool,
) {
    let cache = QueryCache::<u8, &'static str>::new("test", config(Duration::ZERO, retry_count));
    let calls = Arc::new(AtomicUsize::new(0));

    // Fails twice, then succeeds
    let flaky = {
        let calls = calls.clone();
        move || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            futures::future::ready(if call <= 2 {
                Err(anyhow::anyhow!("timeout on attempt {call}"))
            } else {
                Ok("ok")
            })
        }
    };

    let result = cache.fetch(1, flaky).await;
    assert_eq!(result.is_ok(), succeeds);
    assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
}

#[test]
fn retry_delay_doubles_and_is_capped() {
    let base = Duration::from_secs(1);
    assert_eq!(retry_delay(base, 0), Duration::from_secs(1));
    assert_eq!(retry_delay(base, 1), Duration::from_secs(2));
    assert_eq!(retry_delay(base, 3), Duration::from_secs(8));
    assert_eq!(retry_delay(base, 10), MAX_RETRY_DELAY);
    assert_eq!(retry_delay(base, u32::MAX), MAX_RETRY_DELAY);
}

#[tokio::test]
async fn invalidate_forces_a_refetch() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::from_secs(60), 0));
    let calls = Arc::new(AtomicUsize::new(0));

    assert_eq!(*cache.fetch(1, counting_fetcher(&calls)).await.unwrap(), 1);
    assert_eq!(*cache.fetch(2, counting_fetcher(&calls)).await.unwrap(), 2);

    cache.invalidate(&1);
    assert!(cache.cached(&1).is_none());
    assert!(cache.cached(&2).is_some());
    assert_eq!(*cache.fetch(1, counting_fetcher(&calls)).await.unwrap(), 3);

    cache.invalidate_where(|k| *k == 2);
    assert_eq!(*cache.fetch(2, counting_fetcher(&calls)).await.unwrap(), 4);

    cache.invalidate_all();
    assert!(cache.cached(&1).is_none());
    assert!(cache.cached(&2).is_none());
}

#[tokio::test]
async fn invalidated_in_flight_result_is_discarded() {
    let cache = Arc::new(QueryCache::<u8, &'static str>::new(
        "test",
        config(Duration::from_secs(60), 0),
    ));
    let gate = Arc::new(Notify::new());

    let slow_old = {
        let gate = gate.clone();
        move || {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok("before write")
            }
        }
    };

    let old_read = tokio::spawn({
        let cache = cache.clone();
        async move { cache.fetch(1, slow_old).await }
    });
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    cache.invalidate(&1);
    let new_value = cache
        .fetch(1, || futures::future::ready(Ok("after write")))
        .await
        .unwrap();
    assert_eq!(*new_value, "after write");

    gate.notify_one();
    assert_eq!(*old_read.await.unwrap().unwrap(), "before write");

    assert_eq!(cache.cached(&1).as_deref(), Some(&"after write"));
}

#[tokio::test]
async fn dropped_waiter_does_not_cancel_the_request() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::from_secs(60), 0));
    let calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Notify::new());

    let fetcher = {
        let calls = calls.clone();
        let gate = gate.clone();
        move || {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            }
        }
    };

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), cache.fetch(3, fetcher.clone())).await;
    assert!(timed_out.is_err());

    gate.notify_one();
    assert_eq!(*cache.fetch(3, fetcher).await.unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn set_primes_the_cache() {
    let cache = QueryCache::<u8, usize>::new("test", config(Duration::from_secs(60), 0));
    let calls = Arc::new(AtomicUsize::new(0));

    cache.set(9, 42);
    assert_eq!(*cache.fetch(9, counting_fetcher(&calls)).await.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn huge_retry_count_is_logged_without_overflow() {
    let cache = QueryCache::<u8, &'static str>::new("test", config(Duration::ZERO, u32::MAX));
    let calls = Arc::new(AtomicUsize::new(0));

    let fails_once = {
        let calls = calls.clone();
        move || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(if call == 0 {
                Err(anyhow::anyhow!("connection reset"))
            } else {
                Ok("ok")
            })
        }
    };

    assert_eq!(*cache.fetch(1, fails_once).await.unwrap(), "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
