//! Priority-Driven FIFO Cache Implementation.
//!
//! A fixed-capacity cache that evicts the entry with the lowest priority.
//! Priorities come from the [`EvictionPolicy`]: with tracking disabled every
//! entry is admitted at the same priority and the cache is a plain FIFO; with
//! insert or read tracking enabled each touch raises a key's priority, and an
//! optional handicap factor lets new keys start relative to the coldest
//! resident key.
//!
//! # How It Works
//!
//! ```text
//!   map: HashMap<K, CacheEntry<V>>            queue: PriorityQueue<K>
//!   ┌──────┬─────────────────────────┐        ┌────────────────────────┐
//!   │ "a"  │ value, Locator#0 ───────┼──────▶ │ ("a", 3.0)             │
//!   │ "b"  │ value, Locator#1 ───────┼──────▶ │ ("b", 1.0)  ◀── min    │
//!   │ "c"  │ value, Locator#2 ───────┼──────▶ │ ("c", 2.0)             │
//!   └──────┴─────────────────────────┘        └────────────────────────┘
//!
//!   put("d") on a full cache:
//!     1. priority = policy.initial_priority(queue.min)
//!     2. queue.insert("d", priority) -> Locator#3, map.insert("d", ...)
//!     3. len > capacity -> queue.pop_min() == "b", map.remove("b")
//! ```
//!
//! Every operation changes the map and the queue together, so a key is either
//! present in both or in neither once the operation returns.
//!
//! # Performance
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get` (no tracking), `peek`, `contains_key` | O(1) |
//! | `get` (read tracking), `touch` | O(log n) |
//! | `put`, `remove`, `pop` | O(log n) |
//! | `evict(n)`, `resize` | O(n log len) |
//!
//! # Thread Safety
//!
//! `FifoCache` is not synchronized; every mutating call, `get` included,
//! needs `&mut self`. Wrap it in a single `Mutex` or use
//! `ConcurrentFifoCache` (feature `concurrent`).

extern crate alloc;

use crate::config::FifoCacheConfig;
use crate::entry::CacheEntry;
use crate::error::ConfigError;
use crate::heap::{Locator, PriorityQueue};
use crate::metrics::{CacheMetrics, FifoCacheMetrics};
use crate::policy::EvictionPolicy;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Upper bound on the number of map and queue slots reserved up front.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Internal FIFO segment containing the actual cache algorithm.
///
/// Shared between `FifoCache` (single-threaded) and `ConcurrentFifoCache`
/// (one lock around one segment).
pub(crate) struct FifoSegment<K, V, S = DefaultHashBuilder> {
    config: FifoCacheConfig,
    policy: EvictionPolicy,
    map: HashMap<K, CacheEntry<V>, S>,
    queue: PriorityQueue<K>,
    metrics: FifoCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoSegment<K, V, S> {
    /// Creates a segment, validating the configuration.
    pub(crate) fn try_init(
        config: FifoCacheConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let reserved = config.capacity.get().min(MAX_PREALLOCATED);
        Ok(FifoSegment {
            config,
            policy: EvictionPolicy::new(&config),
            map: HashMap::with_capacity_and_hasher(reserved, hash_builder),
            queue: PriorityQueue::with_capacity(reserved),
            metrics: FifoCacheMetrics::new(config.is_pure_fifo()),
        })
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn config(&self) -> &FifoCacheConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &FifoCacheMetrics {
        &self.metrics
    }

    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.metrics.record_miss();
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).map(|entry| &entry.value)
    }

    pub(crate) fn priority<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.map.get(key)?;
        self.queue.priority(entry.locator)
    }

    #[inline]
    pub(crate) fn min_priority(&self) -> Option<f64> {
        self.queue.peek_min().map(|(_, priority)| priority)
    }

    /// Raises the priority behind `locator` by one touch.
    fn promote(&mut self, locator: Locator) {
        let Some(current) = self.queue.priority(locator) else {
            panic!("[fifo]: entry locator does not address a live queue element");
        };
        match self.policy.touched(current) {
            Some(next) => {
                if self.queue.update(locator, next) {
                    if next == current {
                        tracing::trace!("[fifo]: touch step lost at priority {}", current);
                    }
                    self.metrics.record_touch(next);
                }
            }
            None => self.metrics.record_saturated_touch(),
        }
    }

    pub(crate) fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(entry) = self.map.get(key) {
            let locator = entry.locator;
            self.promote(locator);
        }
    }

    /// Looks up `key`, counting the lookup and touching on hit when read
    /// tracking is enabled. Returns the locator of the hit.
    fn lookup<Q>(&mut self, key: &Q) -> Option<Locator>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(entry) = self.map.get(key) else {
            self.metrics.record_miss();
            return None;
        };
        let locator = entry.locator;
        self.metrics.core.record_hit();
        if self.policy.tracks_read() {
            self.promote(locator);
        }
        Some(locator)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(key)?;
        self.map.get(key).map(|entry| &entry.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(key)?;
        self.map.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns the previous pair when the key was present, otherwise the pair
    /// evicted to make room, if any.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(entry) = self.map.get_mut(&key) {
            let old_value = mem::replace(&mut entry.value, value);
            let locator = entry.locator;
            self.metrics.core.record_update();
            if self.policy.tracks_insert() {
                self.promote(locator);
            }
            return Some((key, old_value));
        }

        let min_priority = self.min_priority();
        let priority = self.policy.initial_priority(min_priority);
        let handicapped = self.policy.is_handicapped() && min_priority.is_some();
        tracing::trace!(
            "[fifo]: admit key with priority {} (min: {:?})",
            priority,
            min_priority
        );

        let locator = self.queue.insert(key.clone(), priority);
        self.map.insert(key, CacheEntry::new(value, locator));
        self.metrics.record_admission(priority, handicapped);

        let mut evicted = None;
        while self.map.len() > self.config.capacity.get() {
            match self.evict_one() {
                Some(pair) => evicted = Some(pair),
                None => break,
            }
        }
        evicted
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.map.remove(key)?;
        if self.queue.remove(entry.locator).is_none() {
            panic!("[fifo]: removed entry had no live queue element");
        }
        self.metrics.core.record_removal();
        Some(entry.value)
    }

    /// Removes the minimum-priority entry.
    ///
    /// Emptiness is judged by the entry map; a queue that runs dry while the
    /// map still holds entries means the two structures diverged.
    fn evict_one(&mut self) -> Option<(K, V)> {
        if self.map.is_empty() {
            return None;
        }
        let Some((key, priority)) = self.queue.pop_min() else {
            panic!("[fifo]: priority queue is empty while the entry map is not");
        };
        let Some(entry) = self.map.remove(&key) else {
            panic!("[fifo]: priority queue yielded a key missing from the entry map");
        };
        tracing::trace!("[fifo]: evicted entry with priority {}", priority);
        self.metrics.core.record_eviction();
        Some((key, entry.value))
    }

    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        self.evict_one()
    }

    pub(crate) fn evict(&mut self, count: usize) -> Vec<(K, V)> {
        let mut evicted = Vec::with_capacity(count.min(self.map.len()));
        for _ in 0..count {
            match self.evict_one() {
                Some(pair) => evicted.push(pair),
                None => break,
            }
        }
        tracing::debug!(
            "[fifo]: evicted {} of {} requested entries, {} remain",
            evicted.len(),
            count,
            self.map.len()
        );
        evicted
    }

    pub(crate) fn resize(&mut self, capacity: NonZeroUsize) -> Vec<(K, V)> {
        let excess = self.map.len().saturating_sub(capacity.get());
        let evicted = self.evict(excess);
        tracing::debug!(
            "[fifo]: resized capacity {} => {}",
            self.config.capacity,
            capacity
        );
        self.config.capacity = capacity;
        evicted
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!("[fifo]: clear {} entries", self.map.len());
        self.map.clear();
        self.queue.clear();
    }

    pub(crate) fn snapshot(&self) -> HashMap<K, V, S>
    where
        V: Clone,
        S: Clone,
    {
        let mut snapshot =
            HashMap::with_capacity_and_hasher(self.map.len(), self.map.hasher().clone());
        snapshot.extend(
            self.map
                .iter()
                .map(|(key, entry)| (key.clone(), entry.value.clone())),
        );
        snapshot
    }

    /// Checks that the map and the queue describe the same set of keys.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.map.len(), self.queue.len(), "map and queue sizes differ");
        assert!(self.map.len() <= self.config.capacity.get(), "capacity exceeded");
        for (key, entry) in self.map.iter() {
            let queued = self.queue.key(entry.locator);
            assert!(queued == Some(key), "locator does not address the entry's key");
        }
        for (key, priority) in self.queue.iter() {
            let entry = self.map.get(key);
            assert!(entry.is_some(), "queued key missing from the map");
            let locator = entry.map(|e| e.locator);
            assert_eq!(locator.and_then(|l| self.queue.priority(l)), Some(priority));
        }
    }
}

impl<K, V, S> core::fmt::Debug for FifoSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FifoSegment")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("min_priority", &self.queue.peek_min().map(|(_, p)| p))
            .finish()
    }
}

/// A fixed-capacity cache that evicts its lowest-priority entry.
///
/// With the default configuration this is a FIFO cache. Enabling
/// `track_on_insert` and/or `track_on_read` turns re-insertions and/or reads
/// into touches that protect an entry from eviction, and a non-zero
/// `handicap_factor` makes new entries start at `factor × min priority`.
///
/// Ties between equal priorities are broken in favour of keeping the entry
/// whose priority was assigned most recently.
///
/// # Examples
///
/// ```
/// use fifocache::FifoCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = FifoCache::new(NonZeroUsize::new(2).unwrap());
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a"); // reads are not tracked in the default configuration
/// cache.put("c", 3);
///
/// assert_eq!(cache.get(&"a"), None); // oldest entry evicted
/// assert_eq!(cache.get(&"b"), Some(&2));
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
///
/// Read tracking with a handicap:
///
/// ```
/// use fifocache::config::FifoCacheConfig;
/// use fifocache::FifoCache;
/// use core::num::NonZeroUsize;
///
/// let config = FifoCacheConfig {
///     track_on_read: true,
///     handicap_factor: 2.0,
///     ..FifoCacheConfig::new(NonZeroUsize::new(2).unwrap())
/// };
/// let mut cache = FifoCache::init(config, None);
/// cache.put("a", 1); // priority 1
/// cache.put("b", 2); // priority 2 × 1 = 2
/// cache.get(&"a");   // priority 2
/// cache.put("c", 3); // priority 2 × 2 = 4, evicts "b"
///
/// assert!(!cache.contains_key(&"b"));
/// assert!(cache.contains_key(&"a"));
/// assert!(cache.contains_key(&"c"));
/// ```
pub struct FifoCache<K, V, S = DefaultHashBuilder> {
    segment: FifoSegment<K, V, S>,
}

impl<K, V, S> core::fmt::Debug for FifoCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FifoCache")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoCache<K, V, S> {
    /// Creates a pure FIFO cache with the given capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        match FifoSegment::try_init(FifoCacheConfig::new(cap), hash_builder) {
            Ok(segment) => Self { segment },
            Err(_) => unreachable!("the default configuration is always valid"),
        }
    }

    /// Creates a cache from a configuration and a custom hash builder,
    /// validating the configuration first.
    pub fn try_init_with_hasher(
        config: FifoCacheConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        let segment = FifoSegment::try_init(config, hash_builder)?;
        Ok(Self { segment })
    }

    /// Creates a cache from a configuration and a custom hash builder.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; see [`FifoCacheConfig::validate`].
    pub fn init_with_hasher(config: FifoCacheConfig, hash_builder: S) -> Self {
        match Self::try_init_with_hasher(config, hash_builder) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid FifoCacheConfig: {err}"),
        }
    }

    /// Returns the maximum number of key-value pairs the cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Returns the current number of key-value pairs in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache contains no key-value pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the configuration, with the capacity as last set by `resize`.
    #[inline]
    pub fn config(&self) -> &FifoCacheConfig {
        self.segment.config()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// With `track_on_read` enabled a hit touches the key first.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Tracked like [`get`](Self::get).
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without touching it or counting a lookup.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if the cache contains the key. Never touches it.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Inserts a key-value pair into the cache.
    ///
    /// If the key is present its value is replaced (last write wins), the key
    /// is touched when `track_on_insert` is enabled, and the old pair is
    /// returned.
    ///
    /// Otherwise the key is admitted with the policy's initial priority and,
    /// if the cache was full, the lowest-priority entry is evicted and
    /// returned. That can be the new entry itself when every resident entry
    /// outranks it.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }

    /// Raises the priority of `key` by one step. Does nothing if the key is
    /// absent or already at the priority ceiling.
    #[inline]
    pub fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.touch(key)
    }

    /// Removes a key from the cache, returning its value if it was present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes and returns the eviction candidate (the lowest-priority entry).
    ///
    /// # Examples
    ///
    /// ```
    /// use fifocache::FifoCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let mut cache = FifoCache::new(NonZeroUsize::new(3).unwrap());
    /// cache.put("a", 1);
    /// cache.put("b", 2);
    /// cache.touch(&"a");
    ///
    /// assert_eq!(cache.pop(), Some(("b", 2)));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.segment.pop()
    }

    /// Evicts up to `count` entries in eviction order and returns them.
    ///
    /// Stops early once the cache is empty.
    #[inline]
    pub fn evict(&mut self, count: usize) -> Vec<(K, V)> {
        self.segment.evict(count)
    }

    /// Changes the capacity.
    ///
    /// When the cache holds more than `cap` entries, exactly `len() - cap`
    /// lowest-priority entries are evicted first and returned.
    #[inline]
    pub fn resize(&mut self, cap: NonZeroUsize) -> Vec<(K, V)> {
        self.segment.resize(cap)
    }

    /// Like [`resize`](Self::resize) for an unchecked capacity.
    ///
    /// A capacity of zero is rejected and leaves the cache unchanged.
    pub fn try_resize(&mut self, cap: usize) -> Result<Vec<(K, V)>, ConfigError> {
        let cap = NonZeroUsize::new(cap).ok_or(ConfigError::ZeroCapacity)?;
        Ok(self.segment.resize(cap))
    }

    /// Clears the cache, keeping its configuration and metrics.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Returns a copy of all key-value pairs, in no particular order.
    #[inline]
    pub fn snapshot(&self) -> HashMap<K, V, S>
    where
        V: Clone,
        S: Clone,
    {
        self.segment.snapshot()
    }

    /// Returns the current priority of `key` without touching it.
    #[inline]
    pub fn priority<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.priority(key)
    }

    /// Returns the priority of the next eviction candidate.
    #[inline]
    pub fn min_priority(&self) -> Option<f64> {
        self.segment.min_priority()
    }

    /// Records a miss that did not go through [`get`](Self::get), e.g. a
    /// lookup answered with [`peek`](Self::peek).
    #[inline]
    pub fn record_miss(&mut self) {
        self.segment.record_miss();
    }
}

impl<K: Hash + Eq + Clone, V> FifoCache<K, V> {
    /// Creates a pure FIFO cache with the specified capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use fifocache::FifoCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache: FifoCache<&str, u32> = FifoCache::new(NonZeroUsize::new(10).unwrap());
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(cap: NonZeroUsize) -> FifoCache<K, V, DefaultHashBuilder> {
        FifoCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// This is the **recommended** way to create a configured cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; use [`try_init`](Self::try_init)
    /// to handle that case.
    pub fn init(config: FifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        FifoCache::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache from a configuration, validating it first.
    pub fn try_init(
        config: FifoCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        FifoCache::try_init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for FifoCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::policy::{BASE_PRIORITY, PRIORITY_CEILING};
    use std::vec;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn tracked(
        capacity: usize,
        track_on_insert: bool,
        track_on_read: bool,
        handicap_factor: f64,
    ) -> FifoCache<&'static str, i32> {
        FifoCache::init(
            FifoCacheConfig {
                track_on_insert,
                track_on_read,
                handicap_factor,
                ..FifoCacheConfig::new(cap(capacity))
            },
            None,
        )
    }

    #[test]
    fn test_fifo_basic() {
        let mut cache = FifoCache::new(cap(2));
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("b", 2), None);
        assert_eq!(cache.put("c", 3), Some(("a", 1)));

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_fifo_ignores_reads_and_reinserts() {
        let mut cache = FifoCache::new(cap(3));
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        for _ in 0..5 {
            cache.get(&"a");
        }
        assert_eq!(cache.put("a", 10), Some(("a", 1)));
        assert_eq!(cache.priority(&"a"), Some(BASE_PRIORITY));

        // "a" is still the oldest entry.
        assert_eq!(cache.put("d", 4), Some(("a", 10)));
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_read_tracking_with_handicap() {
        let mut cache = tracked(2, false, true, 2.0);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.priority(&"a"), Some(1.0));
        assert_eq!(cache.priority(&"b"), Some(2.0));

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.priority(&"a"), Some(2.0));

        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert_eq!(cache.priority(&"c"), Some(4.0));
        assert!(cache.contains_key(&"a"));
        assert!(cache.contains_key(&"c"));
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_read_tracking_without_handicap_evicts_newcomer() {
        let mut cache = tracked(2, false, true, 0.0);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");
        cache.get(&"b");

        // Residents have priority 2, the newcomer starts at 1 and loses.
        assert_eq!(cache.put("c", 3), Some(("c", 3)));
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key(&"c"));
    }

    #[test]
    fn test_insert_tracking() {
        let mut cache = tracked(2, true, false, 0.0);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 11), Some(("a", 1)));
        assert_eq!(cache.priority(&"a"), Some(2.0));

        // Reads do not count.
        cache.get(&"b");
        assert_eq!(cache.priority(&"b"), Some(1.0));

        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert_eq!(cache.get(&"a"), Some(&11));
    }

    #[test]
    fn test_manual_touch_in_fifo_mode() {
        let mut cache = FifoCache::new(cap(2));
        cache.put("a", 1);
        cache.put("b", 2);
        cache.touch(&"a");
        cache.touch(&"missing");

        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert!(cache.contains_key(&"a"));
    }

    #[test]
    fn test_touch_at_ceiling_is_noop() {
        let mut cache = tracked(4, false, true, 0.0);
        cache.put("a", 1);
        let locator = cache.segment.map.get(&"a").unwrap().locator;
        assert!(cache.segment.queue.update(locator, PRIORITY_CEILING));

        cache.touch(&"a");
        cache.get(&"a");
        assert_eq!(cache.priority(&"a"), Some(PRIORITY_CEILING));
        assert_eq!(cache.segment.metrics().saturated_touches, 2);
    }

    #[test]
    fn test_touch_beyond_precision_requeues_behind_ties() {
        let mut cache = tracked(3, false, true, 0.0);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        let large = 1.0e17;
        for key in ["a", "b", "c"] {
            let locator = cache.segment.map.get(&key).unwrap().locator;
            assert!(cache.segment.queue.update(locator, large));
        }

        // The step rounds away, but "a" still moves behind "b" and "c".
        cache.get(&"a");
        assert_eq!(cache.priority(&"a"), Some(large));
        assert_eq!(cache.segment.metrics().saturated_touches, 0);
        cache.segment.assert_consistent();

        assert_eq!(cache.pop(), Some(("b", 2)));
        assert_eq!(cache.pop(), Some(("c", 3)));
        assert_eq!(cache.pop(), Some(("a", 1)));
    }

    #[test]
    fn test_get_mut_tracks_reads() {
        let mut cache = tracked(2, false, true, 0.0);
        cache.put("a", 1);
        if let Some(value) = cache.get_mut(&"a") {
            *value = 10;
        }
        assert_eq!(cache.peek(&"a"), Some(&10));
        assert_eq!(cache.priority(&"a"), Some(2.0));
    }

    #[test]
    fn test_peek_and_contains_have_no_side_effects() {
        let mut cache = tracked(2, false, true, 0.0);
        cache.put("a", 1);
        assert_eq!(cache.peek(&"a"), Some(&1));
        assert!(cache.contains_key(&"a"));
        assert_eq!(cache.priority(&"a"), Some(1.0));
        assert_eq!(cache.segment.metrics().core.requests, 0);
    }

    #[test]
    fn test_remove() {
        let mut cache = FifoCache::new(cap(3));
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), None);
        assert_eq!(cache.len(), 1);
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_evict_stops_when_empty() {
        let mut cache = FifoCache::new(cap(4));
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.evict(10), vec![("a", 1), ("b", 2), ("c", 3)]);
        assert!(cache.is_empty());
        assert!(cache.evict(3).is_empty());
        assert_eq!(cache.pop(), None);
    }

    #[test]
    fn test_resize_shrinks_lowest_priority_first() {
        let mut cache = FifoCache::new(cap(4));
        for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            cache.put(k, v);
        }
        cache.touch(&"a");

        let evicted = cache.resize(cap(2));
        assert_eq!(evicted, vec![("b", 2), ("c", 3)]);
        assert_eq!(cache.cap().get(), 2);
        assert_eq!(cache.config().capacity.get(), 2);
        assert!(cache.contains_key(&"a"));
        assert!(cache.contains_key(&"d"));
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_resize_grow_keeps_entries() {
        let mut cache = FifoCache::new(cap(2));
        cache.put("a", 1);
        cache.put("b", 2);
        assert!(cache.resize(cap(3)).is_empty());
        cache.put("c", 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_try_resize_rejects_zero() {
        let mut cache = FifoCache::new(cap(2));
        cache.put("a", 1);
        assert_eq!(cache.try_resize(0), Err(ConfigError::ZeroCapacity));
        assert_eq!(cache.cap().get(), 2);
        assert_eq!(cache.try_resize(1).unwrap(), vec![]);
    }

    #[test]
    fn test_clear_resets_contents() {
        let mut cache = tracked(2, false, true, 3.0);
        cache.put("a", 1);
        cache.get(&"a");
        cache.put("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.min_priority(), None);

        // Behaves like a fresh cache: first admission uses the base priority.
        cache.put("c", 3);
        assert_eq!(cache.priority(&"c"), Some(BASE_PRIORITY));
        cache.segment.assert_consistent();
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut cache = FifoCache::new(cap(3));
        cache.put("a", 1);
        cache.put("b", 2);

        let snapshot = cache.snapshot();
        cache.put("c", 3);
        cache.remove(&"a");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a"), Some(&1));
        assert_eq!(snapshot.get("b"), Some(&2));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FifoCacheConfig {
            handicap_factor: f64::NAN,
            ..FifoCacheConfig::new(cap(2))
        };
        let result = FifoCache::<&str, i32>::try_init(config, None);
        assert!(matches!(result, Err(ConfigError::InvalidHandicapFactor(_))));
    }

    #[test]
    #[should_panic(expected = "invalid FifoCacheConfig")]
    fn test_init_panics_on_invalid_config() {
        let config = FifoCacheConfig {
            handicap_factor: -1.0,
            ..FifoCacheConfig::new(cap(2))
        };
        let _cache: FifoCache<&str, i32> = FifoCache::init(config, None);
    }

    #[test]
    fn test_metrics_counts() {
        let mut cache = tracked(2, true, true, 2.0);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");
        cache.get(&"zzz");
        cache.record_miss();
        cache.put("a", 3);
        cache.put("c", 3);
        cache.remove(&"c");

        let metrics = cache.metrics();
        assert_eq!(metrics["requests"], 3.0);
        assert_eq!(metrics["cache_hits"], 1.0);
        assert_eq!(metrics["insertions"], 3.0);
        assert_eq!(metrics["updates"], 1.0);
        assert_eq!(metrics["evictions"], 1.0);
        assert_eq!(metrics["removals"], 1.0);
        assert_eq!(metrics["touches"], 2.0);
        assert_eq!(metrics["handicapped_admissions"], 2.0);
        assert_eq!(cache.algorithm_name(), "FIFO-HANDICAP");
    }

    #[test]
    fn test_borrowed_key_lookup() {
        let mut cache: FifoCache<std::string::String, i32> = FifoCache::new(cap(2));
        cache.put("key".into(), 1);
        assert_eq!(cache.get("key"), Some(&1));
        assert!(cache.contains_key("key"));
        assert_eq!(cache.remove("key"), Some(1));
    }

    #[test]
    fn test_custom_hasher() {
        let mut cache: FifoCache<u32, u32, DefaultHashBuilder> =
            FifoCache::with_hasher(cap(2), DefaultHashBuilder::default());
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key(&1));
    }
}
