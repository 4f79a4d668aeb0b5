//! Cache manager for persisting API responses with expiry
//!
//! Provides a `CacheManager` that stores serializable data in a `Storage`
//! backend together with its write timestamp. Expiry is checked only on read:
//! a stale entry is deleted and reported as absent.

use chrono::Duration;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::storage::Storage;
use crate::config::INVALIDATION_PREFIXES;
use crate::error::StorageError;

/// Version of the on-disk entry envelope; entries with any other version are discarded
const ENTRY_VERSION: u32 = 1;

/// Envelope written for every cached value
#[derive(Debug, Serialize)]
struct CacheEntry<'a, T> {
    version: u32,
    key: &'a str,
    value: &'a T,
    /// When the value was written, in milliseconds since the Unix epoch
    written_at: i64,
}

/// Envelope as read back from storage
#[derive(Debug, Deserialize)]
struct StoredEntry<T> {
    version: u32,
    key: String,
    value: T,
    written_at: i64,
}

/// Outcome of decoding a stored entry
enum Decoded<T> {
    Fresh(T),
    Stale,
    Incompatible,
}

/// Reads and writes expiring entries through a storage backend
///
/// Every `get`/`set` round-trips to storage; there is no in-memory layer.
/// Clones share the same storage and clock.
#[derive(Clone)]
pub struct CacheManager {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager").field("ttl", &self.ttl).finish()
    }
}

impl CacheManager {
    /// Creates a new CacheManager using the system clock
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock), ttl)
    }

    /// Creates a new CacheManager with an explicit clock
    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            storage,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads a fresh value from the cache
    ///
    /// Returns `None` if the entry is missing, stale, unreadable, or was written
    /// with an incompatible format. Stale and incompatible entries are deleted.
    /// Storage read failures are logged and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_with_ttl(key, self.ttl).await
    }

    /// Reads a value using a TTL other than the configured one
    pub async fn get_with_ttl<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Error reading cached data");
                return None;
            }
        };

        match self.decode(key, &raw, ttl) {
            Decoded::Fresh(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Decoded::Stale => {
                debug!(key, "cache entry expired");
                self.purge(key).await;
                None
            }
            Decoded::Incompatible => {
                warn!(key, "discarding incompatible cache entry");
                self.purge(key).await;
                None
            }
        }
    }

    /// Writes a value to the cache, stamped with the current time
    ///
    /// Overwrites any previous entry under `key`.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let entry = CacheEntry {
            version: ENTRY_VERSION,
            key,
            value,
            written_at: self.clock.now().timestamp_millis(),
        };
        let json = serde_json::to_string(&entry)?;
        self.storage.set(key, &json).await
    }

    /// Deletes every entry whose key starts with one of `prefixes`
    ///
    /// Returns the number of entries removed.
    pub async fn clear(&self, prefixes: &[&str]) -> Result<usize, StorageError> {
        let keys: Vec<String> = self
            .storage
            .list_keys()
            .await?
            .into_iter()
            .filter(|key| prefixes.iter().any(|prefix| key.starts_with(prefix)))
            .collect();

        if !keys.is_empty() {
            self.storage.delete_many(&keys).await?;
        }
        info!(removed = keys.len(), "cleared cache entries");
        Ok(keys.len())
    }

    /// Clears the standard invalidation groups
    pub async fn clear_groups(&self) -> Result<usize, StorageError> {
        self.clear(INVALIDATION_PREFIXES).await
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, raw: &str, ttl: Duration) -> Decoded<T> {
        let entry: StoredEntry<T> = match serde_json::from_str(raw) {
            Ok(entry) => entry,
            Err(_) => return Decoded::Incompatible,
        };
        if entry.version != ENTRY_VERSION || entry.key != key {
            return Decoded::Incompatible;
        }

        let Some(age_ms) = self.clock.now().timestamp_millis().checked_sub(entry.written_at) else {
            return Decoded::Incompatible;
        };
        if age_ms > ttl.num_milliseconds() {
            Decoded::Stale
        } else {
            Decoded::Fresh(entry.value)
        }
    }

    async fn purge(&self, key: &str) {
        if let Err(e) = self.storage.delete_many(&[key.to_string()]).await {
            warn!(key, error = %e, "failed to delete cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::storage::{FileStorage, MemoryStorage};
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tempfile::TempDir;

    const HOUR_MS: i64 = 3_600_000;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (CacheManager, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::new();
        let clock = ManualClock::at_millis(0);
        let cache = CacheManager::with_clock(
            Arc::new(storage.clone()),
            Arc::new(clock.clone()),
            Duration::milliseconds(HOUR_MS),
        );
        (cache, storage, clock)
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let (cache, _storage, _clock) = create_test_cache();

        let result: Option<TestData> = cache.get("nonexistent_key").await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fresh_entry_round_trips_exactly() {
        let (cache, _storage, clock) = create_test_cache();
        let data = json!({"price": "150.25", "nested": {"list": [1, 2.5, null, "x"]}});

        cache.set("globalQuote_AAPL", &data).await.expect("Set should succeed");
        clock.set_millis(HOUR_MS);

        let result: serde_json::Value = cache.get("globalQuote_AAPL").await.expect("Should be fresh");
        assert_eq!(result, data);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl_and_is_purged() {
        let (cache, storage, clock) = create_test_cache();
        let data = TestData {
            name: "expired".to_string(),
            value: 0,
        };

        cache.set("expired_key", &data).await.unwrap();
        clock.set_millis(HOUR_MS + 1);

        let result: Option<TestData> = cache.get("expired_key").await;

        assert!(result.is_none(), "Entry older than TTL should be absent");
        let keys = storage.list_keys().await.unwrap();
        assert!(!keys.contains(&"expired_key".to_string()), "Stale entry should be deleted");
    }

    #[tokio::test]
    async fn test_per_call_ttl_override() {
        let (cache, _storage, clock) = create_test_cache();
        cache.set("k", &1).await.unwrap();
        clock.set_millis(10_000);

        let short: Option<i32> = cache.get_with_ttl("k", Duration::seconds(5)).await;
        assert!(short.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_resets_timestamp() {
        let (cache, _storage, clock) = create_test_cache();
        cache.set("k", &1).await.unwrap();
        clock.set_millis(HOUR_MS - 1);
        cache.set("k", &2).await.unwrap();
        clock.set_millis(HOUR_MS + 10);

        let result: Option<i32> = cache.get("k").await;
        assert_eq!(result, Some(2));
    }

    #[tokio::test]
    async fn test_incompatible_entries_are_discarded() {
        let (cache, storage, _clock) = create_test_cache();
        storage.set("legacy", "{\"data\":1,\"timestamp\":0}").await.unwrap();
        storage
            .set("future", "{\"version\":99,\"key\":\"future\",\"value\":1,\"written_at\":0}")
            .await
            .unwrap();
        storage.set("garbage", "not json").await.unwrap();

        for key in ["legacy", "future", "garbage"] {
            let result: Option<i32> = cache.get(key).await;
            assert!(result.is_none(), "{} should be treated as absent", key);
        }
        assert!(storage.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_is_discarded() {
        let (cache, storage, clock) = create_test_cache();
        clock.set_millis(HOUR_MS);
        let raw = json!({"version": 1, "key": "k", "value": 1, "written_at": i64::MIN});
        storage.set("k", &raw.to_string()).await.unwrap();

        let result: Option<i32> = cache.get("k").await;

        assert!(result.is_none());
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_payload_shape_mismatch_is_a_miss() {
        let (cache, _storage, _clock) = create_test_cache();
        cache.set("k", &"a string").await.unwrap();

        let result: Option<TestData> = cache.get("k").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_only_matching_prefixes() {
        let (cache, storage, _clock) = create_test_cache();
        for key in ["companyOverview_AAPL", "companyOverview_MSFT", "globalQuote_AAPL", "watchlists"] {
            cache.set(key, &1).await.unwrap();
        }

        let removed = cache.clear(&["companyOverview_", "search_"]).await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(storage.list_keys().await.unwrap(), vec!["globalQuote_AAPL", "watchlists"]);
    }

    #[tokio::test]
    async fn test_clear_with_no_matches_is_ok() {
        let (cache, _storage, _clock) = create_test_cache();
        assert_eq!(cache.clear_groups().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cache_survives_file_storage_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::new(
            Arc::new(FileStorage::with_dir(temp_dir.path().to_path_buf())),
            Duration::hours(1),
        );
        let original = TestData {
            name: "roundtrip".to_string(),
            value: 12345,
        };

        cache.set("roundtrip_key", &original).await.expect("Set should succeed");
        let result: TestData = cache.get("roundtrip_key").await.expect("Should read cache");

        assert_eq!(result, original);
        let content = std::fs::read_to_string(temp_dir.path().join("roundtrip_key.json")).unwrap();
        assert!(content.contains("\"written_at\""));
        assert!(content.contains("\"version\":1"));
    }
}
