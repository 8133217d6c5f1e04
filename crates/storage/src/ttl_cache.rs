//! In-memory key/value cache with per-entry expiry.
//!
//! Expired entries are only removed when `get`/`has` touches them; there is
//! no background eviction.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::{to_time_delta, Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
}

/// Cache whose entries count as absent once `now - created_at > ttl`.
///
/// Safe to share across tasks; a poisoned lock is recovered rather than
/// surfaced, so no operation ever fails.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("len", &self.lock().len()).field("ttl", &self.ttl).finish()
    }
}

impl<K, V> TtlCache<K, V> {
    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl: to_time_delta(ttl), clock }
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.created_at) > self.ttl
    }

    /// Store `value` stamped with the current time, replacing any previous entry.
    pub fn set(&self, key: K, value: V) {
        let now = self.clock.now();
        self.set_at(key, value, now);
    }

    /// Store `value` with an explicit creation time (e.g. when mirroring a persisted entry).
    pub fn set_at(&self, key: K, value: V, created_at: DateTime<Utc>) {
        self.lock().insert(key, CacheEntry { value, created_at });
    }

    /// Fresh value for `key`. An expired entry is evicted and reported as a miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = self.is_expired(entries.get(key)?, now);
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Same freshness check as [`TtlCache::get`] without cloning the value.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let mut entries = self.lock();
        let Some(entry) = entries.get(key) else {
            return false;
        };
        if self.is_expired(entry, now) {
            entries.remove(key);
            return false;
        }
        true
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().remove(key).map(|entry| entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(60);

    fn cache_with_clock() -> (TtlCache<String, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = TtlCache::with_clock(TTL, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get_hits() {
        let (cache, _clock) = cache_with_clock();
        cache.set("n5-verbs".to_owned(), 7);
        assert_eq!(cache.get("n5-verbs"), Some(7));
        assert!(cache.has("n5-verbs"));
    }

    #[test]
    fn test_hit_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_owned(), 1);
        clock.advance(TTL);
        assert_eq!(cache.get("k"), Some(1));
    }

    #[test]
    fn test_expired_entry_is_miss_and_evicted() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_owned(), 1);
        clock.advance(TTL + Duration::from_secs(1));

        assert_eq!(cache.get("k"), None);
        assert!(!cache.has("k"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_has_evicts_expired_entry() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_owned(), 1);
        clock.advance(TTL * 2);

        assert_eq!(cache.len(), 1);
        assert!(!cache.has("k"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock();
        cache.set("k".to_owned(), 1);
        clock.advance(Duration::from_secs(50));
        cache.set("k".to_owned(), 2);
        clock.advance(Duration::from_secs(50));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_set_at_uses_given_timestamp() {
        let (cache, clock) = cache_with_clock();
        let old = clock.now() - TimeDelta::seconds(120);
        cache.set_at("k".to_owned(), 1, old);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_clear_and_remove() {
        let (cache, _clock) = cache_with_clock();
        cache.set("a".to_owned(), 1);
        cache.set("b".to_owned(), 2);
        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.get("a"), None);
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.has("b"));
    }
}
