//! FIFO Cache Metrics
//!
//! Metrics specific to the priority-driven FIFO cache: how often keys were
//! touched, how often touches hit the priority ceiling, and how many admissions
//! were handicapped.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// FIFO-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone, PartialEq)]
pub struct FifoCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Touches that raised a priority
    pub touches: u64,

    /// Touches ignored because the key was already at the priority ceiling
    pub saturated_touches: u64,

    /// Admissions whose priority was scaled from the current minimum
    pub handicapped_admissions: u64,

    /// Lowest priority assigned so far, `0.0` before the first admission
    pub min_priority: f64,

    /// Highest priority assigned so far, may be infinite
    pub max_priority: f64,

    /// Whether the owning cache runs the pure FIFO configuration
    pure_fifo: bool,

    observed: bool,
}

impl FifoCacheMetrics {
    /// Creates zeroed metrics.
    ///
    /// # Arguments
    /// * `pure_fifo` - Whether the owning cache tracks neither inserts nor reads;
    ///   only affects [`CacheMetrics::algorithm_name`]
    pub fn new(pure_fifo: bool) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            touches: 0,
            saturated_touches: 0,
            handicapped_admissions: 0,
            min_priority: 0.0,
            max_priority: 0.0,
            pure_fifo,
            observed: false,
        }
    }

    /// Records a new key admitted with `priority`.
    pub fn record_admission(&mut self, priority: f64, handicapped: bool) {
        self.core.record_insertion();
        if handicapped {
            self.handicapped_admissions += 1;
        }
        self.observe_priority(priority);
    }

    /// Records a touch that moved a key to `priority`.
    pub fn record_touch(&mut self, priority: f64) {
        self.touches += 1;
        self.observe_priority(priority);
    }

    /// Records a touch on a key already at the ceiling.
    pub fn record_saturated_touch(&mut self) {
        self.saturated_touches += 1;
    }

    /// Records a lookup miss.
    pub fn record_miss(&mut self) {
        self.core.record_miss();
    }

    fn observe_priority(&mut self, priority: f64) {
        if !self.observed {
            self.observed = true;
            self.min_priority = priority;
            self.max_priority = priority;
            return;
        }
        if priority < self.min_priority {
            self.min_priority = priority;
        }
        if priority > self.max_priority {
            self.max_priority = priority;
        }
    }

    /// Average number of touches per admitted key.
    pub fn touches_per_insertion(&self) -> f64 {
        if self.core.insertions > 0 {
            self.touches as f64 / self.core.insertions as f64
        } else {
            0.0
        }
    }

    /// Converts FIFO metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("touches".to_string(), self.touches as f64);
        metrics.insert(
            "saturated_touches".to_string(),
            self.saturated_touches as f64,
        );
        metrics.insert(
            "handicapped_admissions".to_string(),
            self.handicapped_admissions as f64,
        );
        metrics.insert("min_priority".to_string(), self.min_priority);
        metrics.insert("max_priority".to_string(), self.max_priority);
        metrics.insert(
            "touches_per_insertion".to_string(),
            self.touches_per_insertion(),
        );

        metrics
    }
}

impl CacheMetrics for FifoCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        if self.pure_fifo {
            "FIFO"
        } else {
            "FIFO-HANDICAP"
        }
    }
}
