#![no_std]
extern crate alloc;
extern crate fifocache;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use fifocache::config::FifoCacheConfig;
use fifocache::metrics::CacheMetrics;
use fifocache::FifoCache;

fn make_fifo<K: core::hash::Hash + Eq + Clone, V>(cap: usize) -> FifoCache<K, V> {
    FifoCache::init(FifoCacheConfig::new(NonZeroUsize::new(cap).unwrap()), None)
}

fn make_read_tracked<K: core::hash::Hash + Eq + Clone, V>(
    cap: usize,
    handicap_factor: f64,
) -> FifoCache<K, V> {
    let config = FifoCacheConfig {
        track_on_read: true,
        handicap_factor,
        ..FifoCacheConfig::new(NonZeroUsize::new(cap).unwrap())
    };
    FifoCache::init(config, None)
}

#[test]
fn test_fifo_in_no_std() {
    let mut cache = make_fifo(2);

    // Using String as it requires the alloc crate
    let key1 = String::from("key1");
    let key2 = String::from("key2");
    let key3 = String::from("key3");

    cache.put(key1.clone(), 1);
    cache.put(key2.clone(), 2);
    assert_eq!(*cache.get(&key1).unwrap(), 1);

    // This should evict key1 even though it was just read
    cache.put(key3.clone(), 3);

    assert!(cache.get(&key1).is_none());
    assert_eq!(*cache.get(&key2).unwrap(), 2);
    assert_eq!(*cache.get(&key3).unwrap(), 3);
}

#[test]
fn test_read_tracking_in_no_std() {
    let mut cache = make_read_tracked(2, 0.0);

    let key1 = String::from("key1");
    let key2 = String::from("key2");
    cache.put(key1.clone(), 1);
    cache.put(key2.clone(), 2);

    cache.get(&key1);
    cache.get(&key1);

    // key2 has the lowest priority; the newcomer starts at 1.0 too but is newer.
    let key3 = String::from("key3");
    cache.put(key3.clone(), 3);

    assert_eq!(*cache.get(&key1).unwrap(), 1);
    assert!(cache.get(&key2).is_none());
    assert_eq!(*cache.get(&key3).unwrap(), 3);
}

#[test]
fn test_handicap_in_no_std() {
    let mut cache = make_read_tracked(4, 2.0);
    let keys: Vec<String> = (0..6).map(|i| format!("key{i}")).collect();

    for (i, key) in keys.iter().enumerate() {
        cache.put(key.clone(), i);
    }

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.algorithm_name(), "FIFO-HANDICAP");
    assert_eq!(cache.metrics()["evictions"], 2.0);
}

#[test]
fn test_complex_types_in_no_std() {
    let mut cache = make_fifo(2);

    let key1 = Vec::<u8>::from([1, 2, 3]);
    let value1 = Vec::<i32>::from([10, 20, 30]);

    let key2 = Vec::<u8>::from([4, 5, 6]);
    let value2 = Vec::<i32>::from([40, 50, 60]);

    cache.put(key1.clone(), value1.clone());
    cache.put(key2.clone(), value2.clone());

    assert_eq!(*cache.get(&key1).unwrap(), value1);
    assert_eq!(*cache.get(&key2).unwrap(), value2);

    let drained = cache.evict(2);
    assert_eq!(drained.len(), 2);
    assert!(cache.is_empty());
}
