#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Choosing a Configuration
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               Which FifoCacheConfig Should I Use?                    │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  Does popularity matter for your workload?                          │
//! │                                                                     │
//! │     No ──▶ FifoCacheConfig::new(cap)          (plain FIFO)          │
//! │     │                                                               │
//! │    Yes ──▶ Which events show a key is hot?                          │
//! │              reads ─────▶ track_on_read = true                      │
//! │              rewrites ──▶ track_on_insert = true                    │
//! │                                                                     │
//! │            Should new keys get a head start over cold residents?    │
//! │              yes ──▶ handicap_factor > 0 (new = factor × min)       │
//! │              no ───▶ handicap_factor = 0 (new = 1.0)                │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Configuration | Admission priority | Touch on |
//! |---------------|--------------------|----------|
//! | FIFO (default) | 1.0 | `touch()` only |
//! | Read tracking | 1.0 | `get()`, `get_mut()`, `touch()` |
//! | Insert tracking | 1.0 | re-`put()`, `touch()` |
//! | Handicapped | `factor × min priority` | as configured |
//!
//! ## Code Examples
//!
//! ### Plain FIFO
//!
//! ```rust
//! use fifocache::FifoCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = FifoCache::new(NonZeroUsize::new(2).unwrap());
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // reads do not matter
//! cache.put("c", 3);    // "a" evicted (oldest)
//! assert!(cache.get(&"a").is_none());
//! ```
//!
//! ### Frequency with a Handicap
//!
//! ```rust
//! use fifocache::FifoCache;
//! use fifocache::config::FifoCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = FifoCacheConfig {
//!     track_on_read: true,
//!     handicap_factor: 2.0,
//!     ..FifoCacheConfig::new(NonZeroUsize::new(2).unwrap())
//! };
//! let mut cache = FifoCache::init(config, None);
//! cache.put("a", 1);    // priority 1
//! cache.put("b", 2);    // priority 2
//! cache.get(&"a");      // priority 2, assigned after "b"
//! cache.put("c", 3);    // priority 4, "b" evicted
//! assert!(!cache.contains_key(&"b"));
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature for a thread-safe version:
//!
//! ```toml
//! [dependencies]
//! fifocache = { version = "0.1", features = ["concurrent"] }
//! ```
//!
//! ## Modules
//!
//! - [`fifo`]: The cache controller
//! - [`heap`]: Addressable min-priority queue
//! - [`policy`]: Admission and touch priority rules
//! - [`config`]: Cache configuration
//! - [`error`]: Configuration errors
//! - [`metrics`]: Metrics collection for cache performance monitoring
//! - `concurrent`: Thread-safe cache (requires `concurrent` feature)

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Cache entry type.
///
/// Pairs each cached value with the handle of its priority queue element.
pub(crate) mod entry;

/// Addressable binary min-heap.
///
/// Orders keys by priority and hands out stable [`heap::Locator`] handles so
/// a key's priority can be raised or removed in O(log n).
pub mod heap;

/// Admission and touch priority rules.
pub mod policy;

/// Cache configuration.
pub mod config;

/// Configuration errors.
pub mod error;

/// Priority-driven FIFO cache implementation.
///
/// Provides a fixed-size cache that evicts the entry with the lowest priority,
/// which is the oldest entry unless touches have raised it.
pub mod fifo;

/// Cache metrics system.
///
/// Provides metrics collection and reporting through a common interface.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use config::FifoCacheConfig;
pub use error::ConfigError;
pub use fifo::FifoCache;
pub use policy::EvictionPolicy;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentFifoCache;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::num::NonZeroUsize;
    use scoped_threadpool::Pool;
    use std::sync::Mutex;

    #[test]
    fn test_cache_behind_mutex_from_scoped_threads() {
        let cache = Mutex::new(FifoCache::new(NonZeroUsize::new(64).unwrap()));
        let mut pool = Pool::new(4);

        pool.scoped(|scope| {
            for t in 0..4u32 {
                let cache = &cache;
                scope.execute(move || {
                    for i in 0..100u32 {
                        let mut guard = cache.lock().unwrap();
                        guard.put(t * 1000 + i, i);
                        let _ = guard.get(&(t * 1000 + i));
                    }
                });
            }
        });

        let cache = cache.into_inner().unwrap();
        assert_eq!(cache.len(), 64);
    }
}
