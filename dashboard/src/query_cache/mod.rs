//! A keyed cache of fetch results that mirrors the backend for a short while.
//!
//! Concurrent reads of the same key share one request. Values are dropped on
//! invalidation, failures are never stored, and a request keeps running even
//! if everyone waiting for it goes away.

use std::{
    collections::HashMap,
    future::Future,
    hash::Hash,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use logging::tracing_utils::spawn_in_current_span;
use utils::{time::Time, time_getter::TimeGetter};

const DEFAULT_STALE_TIME: Duration = Duration::ZERO;
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCacheConfig {
    /// Age after which a cached value is fetched again on read
    pub stale_time: Duration,
    /// Additional attempts after a failed fetch
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub retry_delay: Duration,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum QueryError {
    #[error("{0:#}")]
    Fetch(Arc<anyhow::Error>),
    #[error("The request was aborted before it completed")]
    Aborted,
}

type FetchResult<V> = Result<Arc<V>, QueryError>;
type SharedFetch<V> = Shared<BoxFuture<'static, FetchResult<V>>>;

enum Entry<V> {
    Ready { value: Arc<V>, fetched_at: Time },
    InFlight { generation: u64, fetch: SharedFetch<V> },
}

type Entries<K, V> = Arc<Mutex<HashMap<K, Entry<V>>>>;

pub struct QueryCache<K, V> {
    name: &'static str,
    config: QueryCacheConfig,
    time_getter: TimeGetter,
    entries: Entries<K, V>,
    next_generation: AtomicU64,
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + std::fmt::Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// `name` only shows up in logs
    pub fn new(name: &'static str, config: QueryCacheConfig) -> Self {
        Self::with_time_getter(name, config, TimeGetter::default())
    }

    pub fn with_time_getter(
        name: &'static str,
        config: QueryCacheConfig,
        time_getter: TimeGetter,
    ) -> Self {
        Self {
            name,
            config,
            time_getter,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Returns the cached value of `key` if it's fresh. Otherwise joins the request already in
    /// flight for `key`, or starts one with `fetcher`.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> FetchResult<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.lock();
            match entries.get(&key) {
                Some(Entry::Ready { value, fetched_at }) if self.is_fresh(*fetched_at) => {
                    tracing::trace!("{}: serving {key:?} from cache", self.name);
                    return Ok(value.clone());
                }
                Some(Entry::InFlight { fetch, .. }) => {
                    tracing::debug!("{}: joining in-flight request for {key:?}", self.name);
                    fetch.clone()
                }
                Some(Entry::Ready { .. }) | None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let fetch = self.start_fetch(key.clone(), generation, fetcher);
                    entries.insert(
                        key,
                        Entry::InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        fetch.await
    }

    /// The cached value of `key`, fresh or not, without fetching
    #[must_use]
    pub fn cached(&self, key: &K) -> Option<Arc<V>> {
        match self.lock().get(key) {
            Some(Entry::Ready { value, .. }) => Some(value.clone()),
            Some(Entry::InFlight { .. }) | None => None,
        }
    }

    /// Stores a value obtained elsewhere, e.g. the response of a write
    pub fn set(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let fetched_at = self.time_getter.get_time();
        self.lock().insert(
            key,
            Entry::Ready {
                value: value.clone(),
                fetched_at,
            },
        );
        value
    }

    /// Drops `key` so that the next read fetches it again. A request in flight is left running,
    /// but its result is not stored.
    pub fn invalidate(&self, key: &K) {
        if self.lock().remove(key).is_some() {
            tracing::debug!("{}: invalidated {key:?}", self.name);
        }
    }

    pub fn invalidate_where(&self, mut predicate: impl FnMut(&K) -> bool) {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|k, _| !predicate(k));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("{}: invalidated {removed} entries", self.name);
        }
    }

    pub fn invalidate_all(&self) {
        self.invalidate_where(|_| true);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, fetched_at: Time) -> bool {
        self.time_getter.get_time().saturating_sub(fetched_at) < self.config.stale_time
    }

    fn start_fetch<F, Fut>(&self, key: K, generation: u64, fetcher: F) -> SharedFetch<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let name = self.name;
        let config = self.config;
        let entries = self.entries.clone();
        let time_getter = self.time_getter.clone();

        tracing::debug!("{name}: fetching {key:?}");

        let handle = spawn_in_current_span(async move {
            let result = fetch_with_retries(name, &config, &fetcher)
                .await
                .map(Arc::new)
                .map_err(|e| QueryError::Fetch(Arc::new(e)));

            let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
            let still_wanted = matches!(
                entries.get(&key),
                Some(Entry::InFlight { generation: g, .. }) if *g == generation
            );
            if still_wanted {
                match &result {
                    Ok(value) => {
                        entries.insert(
                            key,
                            Entry::Ready {
                                value: value.clone(),
                                fetched_at: time_getter.get_time(),
                            },
                        );
                    }
                    Err(e) => {
                        tracing::warn!("{name}: fetching {key:?} failed: {e}");
                        entries.remove(&key);
                    }
                }
            } else {
                tracing::debug!("{name}: discarding result for {key:?}; it was invalidated");
            }

            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                tracing::error!("{name}: fetch task failed to complete: {e}");
                Err(QueryError::Aborted)
            })
        }
        .boxed()
        .shared()
    }
}

async fn fetch_with_retries<V, F, Fut>(
    name: &'static str,
    config: &QueryCacheConfig,
    fetcher: &F,
) -> anyhow::Result<V>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<V>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.retries => {
                let delay = retry_delay(config.retry_delay, attempt);
                attempt += 1;
                tracing::warn!(
                    "{name}: attempt {attempt} of {} failed, retrying in {delay:?}: {e:#}",
                    config.retries.saturating_add(1)
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// `base * 2^attempt`, capped
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

#[cfg(test)]
mod tests;
