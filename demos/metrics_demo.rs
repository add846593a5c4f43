//! Cache Metrics Demonstration
//!
//! Runs the same skewed workload through several configurations and prints
//! their metrics side by side.

use fifocache::config::FifoCacheConfig;
use fifocache::metrics::CacheMetrics;
use fifocache::FifoCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

fn run_workload(config: FifoCacheConfig) -> FifoCache<u32, u32> {
    let mut cache = FifoCache::init(config, None);
    let mut state: u32 = 12345;
    for _ in 0..20_000 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let roll = (state >> 16) % 100;
        // 80% of requests go to 20 hot keys, the rest to 2000 cold keys.
        let key = if roll < 80 {
            roll % 20
        } else {
            100 + (state >> 8) % 2000
        };
        if cache.get(&key).is_none() {
            cache.put(key, key);
        }
    }
    cache
}

fn main() {
    let capacity = NonZeroUsize::new(50).unwrap();
    let base = FifoCacheConfig::new(capacity);

    let configs = [
        ("fifo", base),
        (
            "read",
            FifoCacheConfig {
                track_on_read: true,
                ..base
            },
        ),
        (
            "read x1.5",
            FifoCacheConfig {
                track_on_read: true,
                handicap_factor: 1.5,
                ..base
            },
        ),
        (
            "both x2",
            FifoCacheConfig {
                track_on_insert: true,
                track_on_read: true,
                handicap_factor: 2.0,
                ..base
            },
        ),
    ];

    let results: Vec<(&str, BTreeMap<String, f64>, &'static str)> = configs
        .iter()
        .map(|(label, config)| {
            let cache = run_workload(*config);
            (*label, cache.metrics(), cache.algorithm_name())
        })
        .collect();

    print!("{:<24}", "metric");
    for (label, _, algorithm) in &results {
        print!("{:>18}", format!("{label} ({algorithm})"));
    }
    println!();

    if let Some((_, first, _)) = results.first() {
        for name in first.keys() {
            print!("{name:<24}");
            for (_, metrics, _) in &results {
                print!("{:>18.3}", metrics.get(name).copied().unwrap_or_default());
            }
            println!();
        }
    }
}
