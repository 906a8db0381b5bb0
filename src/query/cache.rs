//! In-memory query cache with a staleness window.

use super::{Payload, QueryKey};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Entries unused for this many staleness windows are dropped.
const EVICT_FACTOR: u32 = 6;
/// Lower bound on the eviction window.
const MIN_EVICT_AFTER: Duration = Duration::from_secs(300);

/// Result of looking a key up.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Younger than the staleness window
    Fresh(Payload),
    /// Usable, but due for a background refresh
    Stale(Payload),
    Missing,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Payload,
    fetched_at: Instant,
}

/// Successful payloads by query key.
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    stale_after: Duration,
    evict_after: Duration,
}

impl QueryCache {
    /// Create a cache whose entries go stale after `stale_after`.
    ///
    /// # Details
    /// Entries older than [`EVICT_FACTOR`] staleness windows, and never less
    /// than [`MIN_EVICT_AFTER`], are treated as missing and dropped on the
    /// next store.
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
            evict_after: stale_after
                .saturating_mul(EVICT_FACTOR)
                .max(MIN_EVICT_AFTER),
        }
    }

    pub fn lookup(&self, key: &QueryKey, now: Instant) -> Lookup {
        let Some(entry) = self.entries.get(key) else {
            return Lookup::Missing;
        };
        let age = now.saturating_duration_since(entry.fetched_at);
        if age >= self.evict_after {
            Lookup::Missing
        } else if age < self.stale_after {
            Lookup::Fresh(entry.payload.clone())
        } else {
            Lookup::Stale(entry.payload.clone())
        }
    }

    pub fn store(&mut self, key: QueryKey, payload: Payload, now: Instant) {
        let evict_after = self.evict_after;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < evict_after);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "dropped unused cache entries");
        }
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn key() -> QueryKey {
        QueryKey::MarketCap {
            quote: "USDT".to_string(),
        }
    }

    fn prices_key(day: u32) -> QueryKey {
        QueryKey::Prices {
            symbols: vec!["BTCUSDT".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
    }

    fn payload() -> Payload {
        Payload::MarketCap(Arc::new(Vec::new()))
    }

    #[test]
    fn test_missing_then_fresh_then_stale() {
        let mut cache = QueryCache::new(Duration::from_secs(300));
        let start = Instant::now();
        assert!(matches!(cache.lookup(&key(), start), Lookup::Missing));

        cache.store(key(), payload(), start);
        assert!(matches!(
            cache.lookup(&key(), start + Duration::from_secs(299)),
            Lookup::Fresh(_)
        ));
        assert!(matches!(
            cache.lookup(&key(), start + Duration::from_secs(300)),
            Lookup::Stale(_)
        ));
    }

    #[test]
    fn test_store_refreshes_timestamp() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.store(key(), payload(), start);
        let later = start + Duration::from_secs(120);
        cache.store(key(), payload(), later);
        assert!(matches!(cache.lookup(&key(), later), Lookup::Fresh(_)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_old_entries_are_evicted() {
        // 60 s staleness evicts after 360 s
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.store(key(), payload(), start);
        assert!(matches!(
            cache.lookup(&key(), start + Duration::from_secs(359)),
            Lookup::Stale(_)
        ));
        assert!(matches!(
            cache.lookup(&key(), start + Duration::from_secs(360)),
            Lookup::Missing
        ));
    }

    #[test]
    fn test_store_prunes_abandoned_selections() {
        let mut cache = QueryCache::new(Duration::from_secs(300));
        let start = Instant::now();
        for day in 1..=28 {
            let at = start + Duration::from_secs(u64::from(day) * 3600);
            cache.store(prices_key(day), payload(), at);
        }
        // Stores an hour apart each prune the previous selection
        assert_eq!(cache.len(), 1);
        assert!(matches!(
            cache.lookup(&prices_key(1), start + Duration::from_secs(28 * 3600)),
            Lookup::Missing
        ));
        assert!(matches!(
            cache.lookup(&prices_key(28), start + Duration::from_secs(28 * 3600)),
            Lookup::Fresh(_)
        ));
    }
}
