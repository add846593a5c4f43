//! Concurrent FIFO Cache Implementation
//!
//! The multi-threaded counterpart to [`FifoCache`](crate::FifoCache): one
//! `FifoSegment` behind one `parking_lot::Mutex`. Every method takes `&self`
//! and holds the lock for the duration of the call, so each operation is
//! atomic with respect to the others and eviction order is exactly that of the
//! single-threaded cache.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            ConcurrentFifoCache           │
//! │  ┌────────────────────────────────────┐  │
//! │  │               Mutex                │  │
//! │  │  ┌──────────────────────────────┐  │  │
//! │  │  │ FifoSegment (map + queue)    │  │  │
//! │  │  └──────────────────────────────┘  │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use fifocache::concurrent::ConcurrentFifoCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentFifoCache::new(NonZeroUsize::new(1000).unwrap()));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 cache.put(format!("key-{}-{}", t, i), i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 400);
//! ```

extern crate alloc;

use crate::config::FifoCacheConfig;
use crate::error::ConfigError;
use crate::fifo::FifoSegment;
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A thread-safe priority-driven FIFO cache.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Clone + Send`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct ConcurrentFifoCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<FifoSegment<K, V, S>>,
}

impl<K, V> ConcurrentFifoCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Creates a pure FIFO concurrent cache with the given capacity.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a concurrent cache from a configuration with an optional hasher.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn init(config: FifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a concurrent cache from a configuration, validating it first.
    pub fn try_init(
        config: FifoCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        Self::try_init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    /// Creates a pure FIFO concurrent cache with a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        match FifoSegment::try_init(FifoCacheConfig::new(cap), hash_builder) {
            Ok(segment) => Self {
                segment: Mutex::new(segment),
            },
            Err(_) => unreachable!("the default configuration is always valid"),
        }
    }

    /// Creates a concurrent cache with a custom hash builder, validating the
    /// configuration first.
    pub fn try_init_with_hasher(
        config: FifoCacheConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        let segment = FifoSegment::try_init(config, hash_builder)?;
        Ok(Self {
            segment: Mutex::new(segment),
        })
    }

    /// Creates a concurrent cache with a custom hash builder.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn init_with_hasher(config: FifoCacheConfig, hash_builder: S) -> Self {
        match Self::try_init_with_hasher(config, hash_builder) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid FifoCacheConfig: {err}"),
        }
    }

    /// Returns the maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> FifoCacheConfig {
        *self.segment.lock().config()
    }

    /// Retrieves a value from the cache.
    ///
    /// Returns a **clone** of the value to avoid holding the lock. For
    /// operations that don't need ownership, use [`get_with()`](Self::get_with).
    /// Touches the key when read tracking is enabled.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Retrieves a value and applies `f` to it while holding the lock.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Retrieves a mutable reference and applies `f` to it while holding the lock.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.segment.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value without touching the key.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Checks if the cache contains a key. Never touches it.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Inserts a key-value pair.
    ///
    /// # Returns
    ///
    /// - `Some((key, old_value))` if the key existed
    /// - `Some(evicted)` if admitting the key evicted an entry
    /// - `None` if inserted with available capacity
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.segment.lock().put(key, value)
    }

    /// Raises the priority of `key` by one step.
    pub fn touch<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().touch(key)
    }

    /// Removes a key from the cache.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    /// Removes and returns the lowest-priority entry.
    pub fn pop(&self) -> Option<(K, V)> {
        self.segment.lock().pop()
    }

    /// Evicts up to `count` entries in eviction order.
    pub fn evict(&self, count: usize) -> Vec<(K, V)> {
        self.segment.lock().evict(count)
    }

    /// Changes the capacity, evicting the excess.
    pub fn resize(&self, cap: NonZeroUsize) -> Vec<(K, V)> {
        self.segment.lock().resize(cap)
    }

    /// Like [`resize`](Self::resize) for an unchecked capacity.
    pub fn try_resize(&self, cap: usize) -> Result<Vec<(K, V)>, ConfigError> {
        let cap = NonZeroUsize::new(cap).ok_or(ConfigError::ZeroCapacity)?;
        Ok(self.segment.lock().resize(cap))
    }

    /// Removes all entries, keeping configuration and metrics.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Returns a copy of all key-value pairs taken under the lock.
    pub fn snapshot(&self) -> HashMap<K, V, S>
    where
        S: Clone,
    {
        self.segment.lock().snapshot()
    }

    /// Returns the current priority of `key`.
    pub fn priority<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().priority(key)
    }

    /// Returns the priority of the next eviction candidate.
    pub fn min_priority(&self) -> Option<f64> {
        self.segment.lock().min_priority()
    }

    /// Records a cache miss for metrics tracking.
    ///
    /// Call this after a failed `get()` when you fetch from the origin.
    pub fn record_miss(&self) {
        self.segment.lock().record_miss();
    }
}

impl<K, V, S> CacheMetrics for ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentFIFO"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentFifoCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentFifoCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::ToString;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    fn make_config(capacity: usize, track_on_read: bool, handicap_factor: f64) -> FifoCacheConfig {
        FifoCacheConfig {
            track_on_read,
            handicap_factor,
            ..FifoCacheConfig::new(NonZeroUsize::new(capacity).unwrap())
        }
    }

    #[test]
    fn test_basic_operations() {
        let cache: ConcurrentFifoCache<String, i32> =
            ConcurrentFifoCache::init(make_config(100, false, 0.0), None);

        assert!(cache.is_empty());
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("d"), None);
        assert_eq!(cache.peek("c"), Some(3));
    }

    #[test]
    fn test_eviction_matches_single_threaded_order() {
        let cache: ConcurrentFifoCache<&str, i32> =
            ConcurrentFifoCache::init(make_config(2, true, 2.0), None);

        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");
        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert!(cache.contains_key(&"a"));
        assert_eq!(cache.priority(&"c"), Some(4.0));
    }

    #[test]
    fn test_get_with_and_get_mut_with() {
        let cache: ConcurrentFifoCache<String, String> =
            ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
        cache.put("key".to_string(), "hello".to_string());

        assert_eq!(cache.get_with("key", |v| v.len()), Some(5));
        assert_eq!(cache.get_with("missing", |v| v.len()), None);

        cache.get_mut_with("key", |v| v.push_str(" world"));
        assert_eq!(cache.get("key").as_deref(), Some("hello world"));
    }

    #[test]
    fn test_resize_and_try_resize() {
        let cache: ConcurrentFifoCache<u32, u32> =
            ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
        for i in 0..4 {
            cache.put(i, i);
        }

        assert_eq!(cache.resize(NonZeroUsize::new(2).unwrap()), std::vec![(0, 0), (1, 1)]);
        assert_eq!(cache.try_resize(0), Err(ConfigError::ZeroCapacity));
        assert_eq!(cache.cap().get(), 2);
        assert_eq!(cache.config().capacity.get(), 2);
    }

    #[test]
    fn test_metrics_name() {
        let cache: ConcurrentFifoCache<u32, u32> =
            ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
        cache.put(1, 1);
        cache.get(&1);
        cache.record_miss();

        let metrics = cache.metrics();
        assert_eq!(cache.algorithm_name(), "ConcurrentFIFO");
        assert_eq!(metrics["requests"], 2.0);
        assert_eq!(metrics["cache_hits"], 1.0);
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        let cache: Arc<ConcurrentFifoCache<String, usize>> =
            Arc::new(ConcurrentFifoCache::init(make_config(100, true, 1.5), None));

        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = std::format!("key_{}", (t * 37 + i) % 300);
                    match i % 4 {
                        0 | 1 => {
                            cache.put(key, i);
                        }
                        2 => {
                            let _ = cache.get(&key);
                        }
                        _ => {
                            let _ = cache.remove(&key);
                        }
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
        assert_eq!(cache.snapshot().len(), cache.len());
    }
}
