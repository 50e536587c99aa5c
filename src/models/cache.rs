use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::utils::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub created_at: Instant,
}

impl CacheEntry {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// An entry whose age equals the lifetime is already stale.
    pub fn is_fresh(&self, now: Instant, lifetime: Duration) -> bool {
        self.age(now) < lifetime
    }
}

/// Request-keyed response cache with a fixed time-to-live.
///
/// Stale entries are only removed when looked up; there is no sweeper.
pub struct ExpiringCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl ExpiringCache {
    pub fn new(lifetime: Duration) -> Self {
        Self::with_clock(lifetime, Arc::new(SystemClock))
    }

    pub fn with_clock(lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            lifetime,
            clock,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if entry.is_fresh(now, self.lifetime) {
            debug!("Cache hit for {}", key);
            return Some(entry.value.clone());
        }

        debug!("Cache entry for {} is stale after {:?}, evicting", key, entry.age(now));
        entries.remove(key);
        None
    }

    pub fn put(&self, key: &str, value: String) {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            created_at: self.clock.now(),
        };
        debug!("Caching response for {}", key);
        self.lock().insert(key.to_string(), entry);
    }

    /// Number of stored entries, stale ones included until they are looked up.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    fn cache_with_clock(secs: u64) -> (ExpiringCache, ManualClock) {
        let clock = ManualClock::new();
        let cache = ExpiringCache::with_clock(Duration::from_secs(secs), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn put_then_get_returns_value() {
        let (cache, _clock) = cache_with_clock(10);
        cache.put("A", "x".to_string());
        assert_eq!(cache.get("A").as_deref(), Some("x"));
    }

    #[test]
    fn missing_key_is_empty() {
        let (cache, _clock) = cache_with_clock(10);
        assert_eq!(cache.get("nope"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn ttl_scenario() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("A", "x".to_string());

        clock.advance(Duration::from_secs(5));
        assert_eq!(cache.get("A").as_deref(), Some("x"));

        clock.advance(Duration::from_secs(6));
        assert_eq!(cache.get("A"), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("A"), None);
    }

    #[test]
    fn age_equal_to_lifetime_is_expired() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("A", "x".to_string());

        clock.advance(Duration::from_secs(10));
        assert_eq!(cache.get("A"), None);
    }

    #[test]
    fn just_under_lifetime_is_fresh() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("A", "x".to_string());

        clock.advance(Duration::from_secs(10) - Duration::from_nanos(1));
        assert_eq!(cache.get("A").as_deref(), Some("x"));
    }

    #[test]
    fn overwrite_replaces_value_and_resets_age() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("A", "v1".to_string());
        clock.advance(Duration::from_secs(8));
        cache.put("A", "v2".to_string());

        assert_eq!(cache.get("A").as_deref(), Some("v2"));
        assert_eq!(cache.len(), 1);

        // v1 would have expired here; v2 is only 4s old
        clock.advance(Duration::from_secs(4));
        assert_eq!(cache.get("A").as_deref(), Some("v2"));
    }

    #[test]
    fn stale_entries_linger_until_looked_up() {
        let (cache, clock) = cache_with_clock(1);
        cache.put("A", "x".to_string());
        cache.put("B", "y".to_string());
        clock.advance(Duration::from_secs(2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("A"), None);
        assert_eq!(cache.len(), 1);
    }
}
