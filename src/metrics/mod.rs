//! Cache Metrics System
//!
//! Counters describing how a cache has been used, reported as a
//! `BTreeMap<String, f64>` through the [`CacheMetrics`] trait.
//!
//! BTreeMap is used rather than a hash map so metrics always come out in the
//! same order, which keeps simulator tables, CSV exports and test assertions
//! reproducible.
//!
//! Counters are cumulative over the lifetime of the cache; `clear` and
//! `resize` do not reset them.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod fifo;

pub use fifo::FifoCacheMetrics;

/// Counters common to every cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (gets and recorded misses)
    pub requests: u64,

    /// Lookups that found the key
    pub cache_hits: u64,

    /// Keys admitted that were not present before
    pub insertions: u64,

    /// Puts that overwrote the value of a present key
    pub updates: u64,

    /// Entries removed to respect the capacity bound, by `resize` or by `evict`/`pop`
    pub evictions: u64,

    /// Entries removed explicitly with `remove`
    pub removals: u64,
}

impl CoreCacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key.
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records the admission of a new key.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an overwrite of a present key.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records the eviction of an entry.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit removal.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Number of lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, `0.0` before the first lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.insertions > 0 {
            metrics.insert(
                "eviction_ratio".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics access for every cache type
///
/// Lets the simulator and other drivers compare caches without knowing their
/// concrete types.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short identifier of the cache algorithm (e.g. "FIFO").
    fn algorithm_name(&self) -> &'static str;
}
