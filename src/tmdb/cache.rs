use moka::{future::Cache, Expiry};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a request may be answered from previously fetched bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always go to the network, never store.
    NoStore,
    /// Reuse a stored body for as long as it stays in the cache.
    ForceCache,
    /// Reuse a stored body for the given window, then refetch.
    Revalidate(Duration),
}

impl CachePolicy {
    fn ttl(self) -> Option<Duration> {
        match self {
            CachePolicy::Revalidate(window) => Some(window),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct CachedBody {
    body: Arc<Value>,
    ttl: Option<Duration>,
}

struct PolicyExpiry;

impl Expiry<String, CachedBody> for PolicyExpiry {
    fn expire_after_create(&self, _key: &String, value: &CachedBody, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBody,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Parsed upstream bodies keyed by request URL.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedBody>,
}

impl ResponseCache {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PolicyExpiry)
            .build();
        Self { entries }
    }

    pub async fn get(&self, url: &str, policy: CachePolicy) -> Option<Arc<Value>> {
        if policy == CachePolicy::NoStore {
            return None;
        }
        self.entries.get(url).await.map(|entry| entry.body)
    }

    pub async fn insert(&self, url: &str, body: Arc<Value>, policy: CachePolicy) {
        if policy == CachePolicy::NoStore {
            return;
        }
        let entry = CachedBody {
            body,
            ttl: policy.ttl(),
        };
        self.entries.insert(url.to_string(), entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_force_cache_keeps_body() {
        let cache = ResponseCache::new(16);
        cache
            .insert("http://x/movie/1", Arc::new(json!({"id": 1})), CachePolicy::ForceCache)
            .await;
        let hit = cache.get("http://x/movie/1", CachePolicy::ForceCache).await;
        assert_eq!(hit.as_deref(), Some(&json!({"id": 1})));
    }

    #[tokio::test]
    async fn test_no_store_bypasses() {
        let cache = ResponseCache::new(16);
        cache
            .insert("http://x/a", Arc::new(json!(1)), CachePolicy::NoStore)
            .await;
        assert!(cache.get("http://x/a", CachePolicy::ForceCache).await.is_none());

        cache
            .insert("http://x/a", Arc::new(json!(1)), CachePolicy::ForceCache)
            .await;
        assert!(cache.get("http://x/a", CachePolicy::NoStore).await.is_none());
    }

    #[tokio::test]
    async fn test_revalidate_window_expires() {
        let cache = ResponseCache::new(16);
        let policy = CachePolicy::Revalidate(Duration::from_millis(50));
        cache.insert("http://x/b", Arc::new(json!(2)), policy).await;
        assert!(cache.get("http://x/b", policy).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("http://x/b", policy).await.is_none());
    }
}
