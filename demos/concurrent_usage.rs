//! Concurrent Cache Usage Examples
//!
//! Multi-threaded usage patterns for `ConcurrentFifoCache`.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

use fifocache::config::FifoCacheConfig;
use fifocache::metrics::CacheMetrics;
use fifocache::ConcurrentFifoCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("=== Concurrent FIFO Cache Examples ===\n");

    basic_sharing();
    read_through_workers();
    zero_copy_access();
}

/// Several writers sharing one cache through `Arc`.
fn basic_sharing() {
    println!("--- Shared writers ---");
    let cache: Arc<ConcurrentFifoCache<String, usize>> =
        Arc::new(ConcurrentFifoCache::new(NonZeroUsize::new(1000).unwrap()));

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    cache.put(format!("thread{t}-key{i}"), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    println!(
        "4 threads wrote 2000 keys in {:?}; {} kept, {} evicted\n",
        start.elapsed(),
        cache.len(),
        cache.metrics()["evictions"]
    );
}

/// Read-through workers against a read-tracking cache with a handicap.
fn read_through_workers() {
    println!("--- Read-through workers ---");
    let config = FifoCacheConfig {
        track_on_read: true,
        handicap_factor: 1.5,
        ..FifoCacheConfig::new(NonZeroUsize::new(100).unwrap())
    };
    let cache: Arc<ConcurrentFifoCache<u64, u64>> =
        Arc::new(ConcurrentFifoCache::init(config, None));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..5_000u64 {
                    // Every other request targets one of ten hot keys.
                    let key = if i % 2 == 0 { i % 10 } else { 1_000 + (i * 7 + t * 13) % 5_000 };
                    if cache.get(&key).is_none() {
                        cache.put(key, key * 2);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = cache.metrics();
    println!(
        "{}: hit rate {:.1}%, hot key 0 priority {:?}\n",
        cache.algorithm_name(),
        metrics["hit_rate"] * 100.0,
        cache.priority(&0)
    );
}

/// `get_with` inspects a value under the lock without cloning it.
fn zero_copy_access() {
    println!("--- Zero-copy access ---");
    let cache: ConcurrentFifoCache<&str, Vec<u8>> =
        ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
    cache.put("blob", vec![0u8; 4096]);

    let len = cache.get_with(&"blob", |blob| blob.len());
    cache.get_mut_with(&"blob", |blob| blob.truncate(16));
    println!(
        "blob was {:?} bytes, now {:?}",
        len,
        cache.get_with(&"blob", |blob| blob.len())
    );
}
