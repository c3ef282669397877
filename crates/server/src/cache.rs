//! Process-wide result cache with tag-based invalidation.
//!
//! Sits in front of the persistence gateway: read paths call
//! [`ResultCache::get_or_compute`] with a key, a tag set, and a TTL;
//! mutations call [`ResultCache::invalidate`] after their write commits.
//!
//! Storage and eviction come from `moka`; the tag layer is built on top
//! because moka has no tag concept. Each tag has a monotonically
//! increasing epoch. Entries snapshot the epoch of every tag they carry
//! at insert time (before their compute runs, so an invalidation racing a
//! recomputation leaves the stored entry already stale); `invalidate`
//! bumps the epoch, which strands every entry holding the old one.
//!
//! Two callers racing on the same missing key may both compute. That is
//! deliberate: computations are idempotent reads, the second result wins,
//! and duplicate work is cheaper than a cross-request lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use moka::Expiry;
use serde::Serialize;
use serde::de::DeserializeOwned;

use stockroom_core::TenantId;

use crate::db::RepositoryError;

/// Stable tag families used for invalidation, scoped per tenant via
/// [`scoped`].
pub mod tags {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const SUPPLIERS: &str = "suppliers";
    pub const CUSTOMERS: &str = "customers";
    pub const SALES: &str = "sales";
    pub const ANALYTICS: &str = "analytics";
    pub const LOCATIONS: &str = "locations";
    pub const BATCHES: &str = "batches";
    pub const PURCHASE_ORDERS: &str = "purchase-orders";
    pub const ACTIVITY_LOG: &str = "activity-log";
}

/// Scope a tag family to one tenant, so invalidating tenant A's products
/// never touches tenant B's entries.
#[must_use]
pub fn scoped(tag: &str, tenant: TenantId) -> String {
    format!("{tag}:{tenant}")
}

/// Build a cache key from an operation name, tenant, and parameter string.
#[must_use]
pub fn key(operation: &str, tenant: TenantId, params: &str) -> String {
    if params.is_empty() {
        format!("{operation}:{tenant}")
    } else {
        format!("{operation}:{tenant}:{params}")
    }
}

/// A stored entry: the serialized value plus everything needed to decide
/// liveness.
#[derive(Debug)]
struct CacheEntry {
    value: serde_json::Value,
    /// Tags with the epoch observed when the entry was created.
    tags: Vec<(String, u64)>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Per-entry TTL policy for moka's eviction (liveness is double-checked
/// on read, eviction just bounds memory).
struct PerEntryExpiry;

impl Expiry<String, Arc<CacheEntry>> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-wide, tag-keyed, TTL-bounded memoization of read results.
///
/// Injected through `AppState` so it can be swapped for a shared cache
/// without touching callers.
pub struct ResultCache {
    entries: moka::future::Cache<String, Arc<CacheEntry>>,
    epochs: RwLock<HashMap<String, u64>>,
}

impl ResultCache {
    /// Create a cache bounded to `max_capacity` entries.
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: moka::future::Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryExpiry)
                .build(),
            epochs: RwLock::new(HashMap::new()),
        }
    }

    /// Return the live cached value for `key`, or run `compute`, cache its
    /// result under `tag_set` for `ttl`, and return it.
    ///
    /// A compute error is returned as-is and nothing is cached. A value
    /// that fails to serialize is returned uncached with a warning —
    /// cache trouble never fails a read.
    ///
    /// # Errors
    ///
    /// Propagates whatever `compute` returns.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        cache_key: &str,
        tag_set: &[String],
        ttl: Duration,
        compute: F,
    ) -> Result<T, RepositoryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        if let Some(entry) = self.entries.get(cache_key).await
            && !entry.is_expired()
            && self.tags_current(&entry.tags)
        {
            match serde_json::from_value(entry.value.clone()) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    // Shape drift across deploys; fall through to recompute
                    tracing::warn!(key = cache_key, error = %e, "Discarding undecodable cache entry");
                }
            }
        }

        // Snapshot epochs before computing: an invalidation that lands
        // while compute runs must strand this entry.
        let tag_epochs = self.snapshot_epochs(tag_set);

        let value = compute().await?;

        match serde_json::to_value(&value) {
            Ok(json) => {
                self.entries
                    .insert(
                        cache_key.to_string(),
                        Arc::new(CacheEntry {
                            value: json,
                            tags: tag_epochs,
                            created_at: Instant::now(),
                            ttl,
                        }),
                    )
                    .await;
            }
            Err(e) => {
                tracing::warn!(key = cache_key, error = %e, "Failed to serialize value for cache");
            }
        }

        Ok(value)
    }

    /// Mark every entry carrying `tag` as stale immediately, independent
    /// of TTL.
    pub fn invalidate(&self, tag: &str) {
        let mut epochs = self.epochs.write().expect("epoch lock poisoned");
        *epochs.entry(tag.to_string()).or_insert(0) += 1;
    }

    /// Invalidate several tags at once.
    pub fn invalidate_all(&self, tag_set: &[String]) {
        for tag in tag_set {
            self.invalidate(tag);
        }
    }

    fn snapshot_epochs(&self, tag_set: &[String]) -> Vec<(String, u64)> {
        let epochs = self.epochs.read().expect("epoch lock poisoned");
        tag_set
            .iter()
            .map(|tag| (tag.clone(), epochs.get(tag).copied().unwrap_or(0)))
            .collect()
    }

    fn tags_current(&self, entry_tags: &[(String, u64)]) -> bool {
        let epochs = self.epochs.read().expect("epoch lock poisoned");
        entry_tags
            .iter()
            .all(|(tag, seen)| epochs.get(tag).copied().unwrap_or(0) == *seen)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

/// Default TTLs per operation family. Tunable, not load-bearing for
/// correctness.
pub mod ttl {
    use std::time::Duration;

    /// Analytics snapshots and alert feeds.
    pub const ANALYTICS: Duration = Duration::from_secs(120);
    /// Reference data: categories, suppliers, locations.
    pub const REFERENCE: Duration = Duration::from_secs(300);
    /// The activity feed.
    pub const ACTIVITY: Duration = Duration::from_secs(30);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn tag_set(tags: &[&str]) -> Vec<String> {
        tags.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_second_read_hits_without_recompute() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: i32 = cache
                .get_or_compute("op:1", &tag_set(&["products:1"]), ttl::ANALYTICS, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_compute_independently() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        for key in ["op:1", "op:2"] {
            let _: i32 = cache
                .get_or_compute(key, &tag_set(&["products:1"]), ttl::ANALYTICS, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute_within_ttl() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        let compute = || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst))
        };

        let first: usize = cache
            .get_or_compute("analytics:1", &tag_set(&["products:1"]), ttl::ANALYTICS, compute)
            .await
            .unwrap();
        assert_eq!(first, 0);

        // A products mutation invalidates the tag; the analytics entry
        // must recompute even though its TTL has not elapsed.
        cache.invalidate("products:1");

        let second: usize = cache
            .get_or_compute("analytics:1", &tag_set(&["products:1"]), ttl::ANALYTICS, compute)
            .await
            .unwrap();
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidating_one_tag_spares_other_entries() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        let _: i32 = cache
            .get_or_compute("suppliers:1", &tag_set(&["suppliers:1"]), ttl::REFERENCE, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();

        cache.invalidate("products:1");

        let _: i32 = cache
            .get_or_compute("suppliers:1", &tag_set(&["suppliers:1"]), ttl::REFERENCE, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entry_with_any_stale_tag_recomputes() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);
        let two_tags = tag_set(&["analytics:1", "sales:1"]);

        let compute = || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst))
        };

        let _: usize = cache
            .get_or_compute("sales_analytics:1", &two_tags, ttl::ANALYTICS, compute)
            .await
            .unwrap();
        cache.invalidate("sales:1");
        let _: usize = cache
            .get_or_compute("sales_analytics:1", &two_tags, ttl::ANALYTICS, compute)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_entries_are_never_reused() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: i32 = cache
                .get_or_compute("op:1", &tag_set(&["products:1"]), Duration::ZERO, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_compute_error_caches_nothing() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        let err: Result<i32, _> = cache
            .get_or_compute("op:1", &tag_set(&["products:1"]), ttl::ANALYTICS, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RepositoryError::NotFound)
            })
            .await;
        assert!(err.is_err());

        // The failure was not cached; the next call computes again
        let ok: i32 = cache
            .get_or_compute("op:1", &tag_set(&["products:1"]), ttl::ANALYTICS, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(5)
            })
            .await
            .unwrap();
        assert_eq!(ok, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_during_compute_strands_the_entry() {
        let cache = ResultCache::new(100);
        let calls = AtomicUsize::new(0);

        // The invalidation lands between the epoch snapshot and the
        // insert; the stored entry must already be stale.
        let _: i32 = cache
            .get_or_compute("op:1", &tag_set(&["products:1"]), ttl::ANALYTICS, || {
                cache.invalidate("products:1");
                async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                }
            })
            .await
            .unwrap();

        let _: i32 = cache
            .get_or_compute("op:1", &tag_set(&["products:1"]), ttl::ANALYTICS, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_key_and_tag_builders() {
        let tenant = TenantId::new(7);
        assert_eq!(key("inventory_analytics", tenant, ""), "inventory_analytics:7");
        assert_eq!(key("sales", tenant, "page=2"), "sales:7:page=2");
        assert_eq!(scoped(tags::PRODUCTS, tenant), "products:7");
    }
}
