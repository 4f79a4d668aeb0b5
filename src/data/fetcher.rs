//! Read-through fetching over the expiring cache
//!
//! A fresh cache hit never runs the producer. A miss runs it once, caches a
//! successful result on a best-effort basis, and applies the caller's failure
//! policy when it fails. Fallback payloads are returned but never cached.
//!
//! Concurrent fetches of the same missing key each run their producer; the
//! last write wins.

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use crate::cache::{CacheManager, FailurePolicy};
use crate::error::ApiError;

/// Failure handling for one fetch
pub enum OnFailure<T> {
    /// Return the producer's error unchanged
    Propagate,
    /// Return the generated payload instead of the error
    Substitute(Box<dyn FnOnce() -> T + Send>),
}

impl<T> OnFailure<T> {
    pub fn substitute(generator: impl FnOnce() -> T + Send + 'static) -> Self {
        OnFailure::Substitute(Box::new(generator))
    }

    pub fn policy(&self) -> FailurePolicy {
        match self {
            OnFailure::Propagate => FailurePolicy::Propagate,
            OnFailure::Substitute(_) => FailurePolicy::SubstituteFallback,
        }
    }
}

impl<T> std::fmt::Debug for OnFailure<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.policy())
    }
}

/// Wraps remote operations with the read-through cache policy
#[derive(Debug, Clone)]
pub struct ReadThroughFetcher {
    cache: CacheManager,
}

impl ReadThroughFetcher {
    pub fn new(cache: CacheManager) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Returns the cached value for `key`, or produces, caches and returns a new one
    ///
    /// # Arguments
    /// * `key` - Cache key identifying the parameterized request
    /// * `producer` - Performs the remote call; only invoked on a miss
    /// * `on_failure` - What to return when the producer fails
    pub async fn fetch<T, P, Fut>(
        &self,
        key: &str,
        producer: P,
        on_failure: OnFailure<T>,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(cached) = self.cache.get::<T>(key).await {
            return Ok(cached);
        }

        match producer().await {
            Ok(value) => {
                if let Err(e) = self.cache.set(key, &value).await {
                    warn!(key, error = %e, "Error caching data");
                }
                Ok(value)
            }
            Err(error) => match on_failure {
                OnFailure::Propagate => {
                    debug!(key, error = %error, "fetch failed");
                    Err(error)
                }
                OnFailure::Substitute(generator) => {
                    warn!(key, error = %error, "fetch failed, serving fallback data");
                    Ok(generator())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, MemoryStorage, Storage};
    use crate::error::{RemoteError, StorageError};
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TTL_MS: i64 = 3_600_000;

    fn create_fetcher() -> (ReadThroughFetcher, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::new();
        let clock = ManualClock::at_millis(0);
        let cache = CacheManager::with_clock(
            Arc::new(storage.clone()),
            Arc::new(clock.clone()),
            Duration::milliseconds(TTL_MS),
        );
        (ReadThroughFetcher::new(cache), storage, clock)
    }

    fn rate_limited() -> ApiError {
        ApiError::Remote(RemoteError::RateLimited("limit".to_string()))
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_producer() {
        let (fetcher, _storage, clock) = create_fetcher();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        fetcher
            .fetch(
                "q_AAPL",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"price": 150}))
                },
                OnFailure::Propagate,
            )
            .await
            .unwrap();
        clock.set_millis(1_800_000);

        let result: Value = fetcher
            .fetch(
                "q_AAPL",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"price": 999}))
                },
                OnFailure::Propagate,
            )
            .await
            .unwrap();

        assert_eq!(result, json!({"price": 150}));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched_and_overwritten() {
        let (fetcher, _storage, clock) = create_fetcher();

        fetcher
            .fetch("q_AAPL", || async { Ok(json!({"price": 150})) }, OnFailure::Propagate)
            .await
            .unwrap();
        clock.set_millis(3_700_000);

        let result: Value = fetcher
            .fetch("q_AAPL", || async { Ok(json!({"price": 151})) }, OnFailure::Propagate)
            .await
            .unwrap();
        assert_eq!(result, json!({"price": 151}));

        let cached: Option<Value> = fetcher.cache().get("q_AAPL").await;
        assert_eq!(cached, Some(json!({"price": 151})));
    }

    #[tokio::test]
    async fn test_propagate_returns_error_and_writes_nothing() {
        let (fetcher, storage, _clock) = create_fetcher();

        let result: Result<Value, ApiError> = fetcher
            .fetch("earnings_IBM", || async { Err(rate_limited()) }, OnFailure::Propagate)
            .await;

        match result {
            Err(ApiError::Remote(RemoteError::RateLimited(msg))) => assert_eq!(msg, "limit"),
            other => panic!("expected rate limit error, got {:?}", other),
        }
        assert!(storage.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_returned_but_never_cached() {
        let (fetcher, storage, _clock) = create_fetcher();

        let result: Value = fetcher
            .fetch(
                "companyOverview_ZZZZ",
                || async { Err(ApiError::HttpStatus(500)) },
                OnFailure::substitute(|| json!({"Symbol": "ZZZZ", "synthetic": true})),
            )
            .await
            .unwrap();
        assert_eq!(result["Symbol"], "ZZZZ");
        assert!(storage.get("companyOverview_ZZZZ").await.unwrap().is_none());

        let real: Value = fetcher
            .fetch(
                "companyOverview_ZZZZ",
                || async { Ok(json!({"Symbol": "ZZZZ", "synthetic": false})) },
                OnFailure::substitute(|| json!({})),
            )
            .await
            .unwrap();
        assert_eq!(real["synthetic"], false);
    }

    #[tokio::test]
    async fn test_generator_not_called_on_success() {
        let (fetcher, _storage, _clock) = create_fetcher();

        let result: Value = fetcher
            .fetch(
                "search_x",
                || async { Ok(json!(1)) },
                OnFailure::substitute(|| json!("fallback")),
            )
            .await
            .unwrap();

        assert_eq!(result, json!(1));
    }

    struct ReadOnlyStorage;

    #[async_trait]
    impl Storage for ReadOnlyStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("read failed")))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }

        async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        async fn delete_many(&self, _keys: &[String]) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_storage_failures_fail_open() {
        let cache = CacheManager::new(Arc::new(ReadOnlyStorage), Duration::hours(1));
        let fetcher = ReadThroughFetcher::new(cache);
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let result: Value = fetcher
                .fetch(
                    "globalQuote_AAPL",
                    move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(json!({"price": 150}))
                    },
                    OnFailure::Propagate,
                )
                .await
                .expect("storage errors must not reach the caller");
            assert_eq!(result, json!({"price": 150}));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 2, "nothing cached, so both calls fetch");
    }

    #[tokio::test]
    async fn test_concurrent_misses_converge_on_one_slot() {
        let (fetcher, storage, _clock) = create_fetcher();

        let (a, b) = futures::future::join(
            fetcher.fetch("sma_AAPL", || async { Ok(json!(1)) }, OnFailure::Propagate),
            fetcher.fetch("sma_AAPL", || async { Ok(json!(1)) }, OnFailure::Propagate),
        )
        .await;

        assert_eq!(a.unwrap(), json!(1));
        assert_eq!(b.unwrap(), json!(1));
        assert_eq!(storage.list_keys().await.unwrap(), vec!["sma_AAPL"]);
    }
}
