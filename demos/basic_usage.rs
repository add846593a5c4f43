//! Basic Usage
//!
//! Walks through the three behaviours of the cache: plain FIFO, read-frequency
//! tracking, and handicapped admission.

use fifocache::config::FifoCacheConfig;
use fifocache::FifoCache;
use std::num::NonZeroUsize;

fn main() {
    let capacity = NonZeroUsize::new(2).unwrap();

    println!("1. Plain FIFO");
    let mut cache = FifoCache::new(capacity);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    if let Some((key, value)) = cache.put("c", 3) {
        println!("   put(c) evicted {key}={value}, reads do not protect");
    }

    println!("2. Read tracking, no handicap");
    let config = FifoCacheConfig {
        track_on_read: true,
        ..FifoCacheConfig::new(capacity)
    };
    let mut cache = FifoCache::init(config, None);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    cache.get(&"b");
    if let Some((key, _)) = cache.put("c", 3) {
        println!("   put(c) evicted {key}, every resident outranked the newcomer");
    }

    println!("3. Read tracking with handicap factor 2");
    let config = FifoCacheConfig {
        track_on_read: true,
        handicap_factor: 2.0,
        ..FifoCacheConfig::new(capacity)
    };
    let mut cache = FifoCache::init(config, None);
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get(&"a");
    for key in ["a", "b"] {
        println!("   priority({key}) = {:?}", cache.priority(&key));
    }
    if let Some((key, _)) = cache.put("c", 3) {
        println!(
            "   put(c) evicted {key}, c entered at {:?}",
            cache.priority(&"c")
        );
    }

    println!("4. Shrinking");
    let mut cache = FifoCache::new(NonZeroUsize::new(5).unwrap());
    for i in 0..5 {
        cache.put(i, i * i);
    }
    let evicted = cache.resize(NonZeroUsize::new(2).unwrap());
    println!("   resize(2) evicted {evicted:?}, kept {:?}", cache.snapshot());
}
