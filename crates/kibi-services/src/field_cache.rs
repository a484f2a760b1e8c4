//! Field list cache keyed by pattern id and interval

use kibi_core::{FieldSpec, Interval, PatternQuery};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The same template text resolves to different indices per interval
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    pattern_id: String,
    interval: Option<Interval>,
}

impl CacheKey {
    fn of(query: &PatternQuery) -> Self {
        Self {
            pattern_id: query.id.clone(),
            interval: query.interval,
        }
    }
}

struct CachedFields {
    fields: Vec<FieldSpec>,
    cached_at: Instant,
}

/// Cache of discovered fields per index pattern
pub struct FieldCache {
    cache: RwLock<HashMap<CacheKey, CachedFields>>,

    /// Cache TTL
    ttl: Duration,
}

impl FieldCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Check if the cached entry for a query is still fresh
    pub fn is_valid(&self, query: &PatternQuery) -> bool {
        tracing::trace!(pattern_id = %query.id, "checking field cache validity");
        self.cache
            .read()
            .get(&CacheKey::of(query))
            .is_some_and(|cached| cached.cached_at.elapsed() < self.ttl)
    }

    /// Get cached fields, ignoring expired entries
    pub fn get(&self, query: &PatternQuery) -> Option<Vec<FieldSpec>> {
        let cache = self.cache.read();
        let result = cache
            .get(&CacheKey::of(query))
            .filter(|cached| cached.cached_at.elapsed() < self.ttl)
            .map(|cached| cached.fields.clone());
        if result.is_some() {
            tracing::debug!(pattern_id = %query.id, interval = ?query.interval, "cache hit for fields");
        } else {
            tracing::debug!(pattern_id = %query.id, interval = ?query.interval, "cache miss for fields");
        }
        result
    }

    pub fn set(&self, query: &PatternQuery, fields: Vec<FieldSpec>) {
        tracing::debug!(pattern_id = %query.id, field_count = fields.len(), "caching fields");
        self.cache.write().insert(
            CacheKey::of(query),
            CachedFields {
                fields,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop every entry for a pattern id, whatever its interval
    pub fn invalidate(&self, pattern_id: &str) {
        tracing::debug!(pattern_id = %pattern_id, "invalidating field cache");
        self.cache.write().retain(|key, _| key.pattern_id != pattern_id);
    }

    pub fn clear(&self) {
        let count = self.cache.read().len();
        tracing::info!(cache_entries = count, "clearing all field caches");
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300)) // 5 minute TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("@timestamp", "date"), FieldSpec::new("host", "string")]
    }

    fn query(id: &str) -> PatternQuery {
        PatternQuery::new(id, None)
    }

    #[test]
    fn test_set_then_get() {
        let cache = FieldCache::default();
        cache.set(&query("logs-*"), fields());
        assert!(cache.is_valid(&query("logs-*")));
        assert_eq!(cache.get(&query("logs-*")), Some(fields()));
        assert_eq!(cache.get(&query("other-*")), None);
    }

    #[test]
    fn test_intervals_are_cached_separately() {
        let cache = FieldCache::default();
        let daily = PatternQuery::new("[logs-]YYYY.MM", Some(Interval::Days));
        let monthly = PatternQuery::new("[logs-]YYYY.MM", Some(Interval::Months));
        cache.set(&daily, fields());

        assert_eq!(cache.get(&daily), Some(fields()));
        assert_eq!(cache.get(&monthly), None);
        assert_eq!(cache.get(&query("[logs-]YYYY.MM")), None);
    }

    #[test]
    fn test_expired_entries_are_ignored() {
        let cache = FieldCache::new(Duration::ZERO);
        cache.set(&query("logs-*"), fields());
        assert!(!cache.is_valid(&query("logs-*")));
        assert_eq!(cache.get(&query("logs-*")), None);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = FieldCache::default();
        cache.set(&query("a"), fields());
        cache.set(&PatternQuery::new("a", Some(Interval::Days)), fields());
        cache.set(&query("b"), fields());
        cache.invalidate("a");
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&query("a")).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
