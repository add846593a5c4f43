//! Eviction Policy
//!
//! Decides the priority a key is admitted with and how far a touch raises it.
//! The cache always evicts the key with the lowest priority, so these two
//! rules fully determine which key goes next.
//!
//! # Priority Rules
//!
//! ```text
//! admission:  tracking off or factor == 0   ──▶  BASE_PRIORITY (1.0)
//!             cache empty                   ──▶  BASE_PRIORITY
//!             otherwise                     ──▶  factor × min_priority
//!
//! touch:      p == CEILING                  ──▶  no change
//!             otherwise                     ──▶  p + 1 (rounded, at most CEILING)
//! ```
//!
//! The ceiling is `f64::INFINITY` and is only reached when an admission
//! product overflows. Once a key sits there every further touch is a no-op.
//!
//! From 2^53 upwards the step is below `f64` precision and `p + 1` may round
//! back to `p`. Such a touch keeps the priority but still counts: the cache
//! requeues the key behind every key of equal priority. It never jumps to the
//! ceiling.
//!
//! All variants (FIFO, frequency, handicap) share these rules and differ only
//! in the values carried by [`EvictionPolicy`].

use crate::config::FifoCacheConfig;

/// Priority given to new entries when no handicap applies.
pub const BASE_PRIORITY: f64 = 1.0;

/// Amount a touch adds to a priority.
pub const TOUCH_STEP: f64 = 1.0;

/// Highest priority a key can reach.
pub const PRIORITY_CEILING: f64 = f64::INFINITY;

/// Priority assignment rules derived from a [`FifoCacheConfig`].
///
/// # Examples
///
/// ```
/// use fifocache::config::FifoCacheConfig;
/// use fifocache::policy::{EvictionPolicy, BASE_PRIORITY};
/// use core::num::NonZeroUsize;
///
/// let config = FifoCacheConfig {
///     track_on_read: true,
///     handicap_factor: 2.0,
///     ..FifoCacheConfig::new(NonZeroUsize::new(4).unwrap())
/// };
/// let policy = EvictionPolicy::new(&config);
///
/// assert_eq!(policy.initial_priority(None), BASE_PRIORITY);
/// assert_eq!(policy.initial_priority(Some(3.0)), 6.0);
/// assert_eq!(policy.touched(6.0), Some(7.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictionPolicy {
    track_on_insert: bool,
    track_on_read: bool,
    handicap_factor: f64,
}

impl EvictionPolicy {
    /// Builds the policy for a configuration.
    pub fn new(config: &FifoCacheConfig) -> Self {
        Self {
            track_on_insert: config.track_on_insert,
            track_on_read: config.track_on_read,
            handicap_factor: config.handicap_factor,
        }
    }

    /// Whether re-inserting a key touches it.
    #[inline]
    pub fn tracks_insert(&self) -> bool {
        self.track_on_insert
    }

    /// Whether reading a key touches it.
    #[inline]
    pub fn tracks_read(&self) -> bool {
        self.track_on_read
    }

    /// Whether admissions are scaled from the current minimum priority.
    #[inline]
    pub fn is_handicapped(&self) -> bool {
        (self.track_on_insert || self.track_on_read) && self.handicap_factor != 0.0
    }

    /// Returns the priority for a newly admitted key.
    ///
    /// `min_priority` is the lowest priority among live entries, `None` when
    /// the cache is empty.
    pub fn initial_priority(&self, min_priority: Option<f64>) -> f64 {
        if !self.is_handicapped() {
            return BASE_PRIORITY;
        }
        match min_priority {
            Some(min) => saturate(self.handicap_factor * min),
            None => BASE_PRIORITY,
        }
    }

    /// Returns the priority after one touch, or `None` if `priority` is
    /// already at the ceiling.
    ///
    /// The result equals `priority` when the step is below its precision.
    pub fn touched(&self, priority: f64) -> Option<f64> {
        if priority >= PRIORITY_CEILING {
            return None;
        }
        Some(saturate(priority + TOUCH_STEP))
    }
}

#[inline]
fn saturate(priority: f64) -> f64 {
    if priority.is_finite() {
        priority
    } else {
        PRIORITY_CEILING
    }
}
