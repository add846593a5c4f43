use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fifocache::config::FifoCacheConfig;
use fifocache::FifoCache;
use std::num::NonZeroUsize;

// Helper to create caches with the init pattern
fn make_cache<K: std::hash::Hash + Eq + Clone, V>(
    cap: usize,
    track_on_insert: bool,
    track_on_read: bool,
    handicap_factor: f64,
) -> FifoCache<K, V> {
    let config = FifoCacheConfig {
        track_on_insert,
        track_on_read,
        handicap_factor,
        ..FifoCacheConfig::new(NonZeroUsize::new(cap).unwrap())
    };
    FifoCache::init(config, None)
}

const CONFIGS: [(&str, bool, bool, f64); 4] = [
    ("FIFO", false, false, 0.0),
    ("read", false, true, 0.0),
    ("insert", true, false, 0.0),
    ("read+handicap", false, true, 2.0),
];

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Cache Operations");

    for (name, ti, tr, factor) in CONFIGS {
        let mut cache = make_cache(CACHE_SIZE, ti, tr, factor);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function(BenchmarkId::new("get hit", name), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function(BenchmarkId::new("get miss", name), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function(BenchmarkId::new("put existing", name), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i));
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function(BenchmarkId::new("put evicting", name), |b| {
            b.iter(|| {
                for _ in 0..100 {
                    next += 1;
                    black_box(cache.put(next, next));
                }
            });
        });
    }

    group.finish();
}

pub fn resize_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 10_000;
    let mut group = c.benchmark_group("Resize");

    group.bench_function("shrink by half", |b| {
        b.iter_batched(
            || {
                let mut cache = make_cache(CACHE_SIZE, false, true, 1.5);
                for i in 0..CACHE_SIZE {
                    cache.put(i, i);
                    if i % 3 == 0 {
                        cache.get(&(i / 2));
                    }
                }
                cache
            },
            |mut cache| black_box(cache.resize(NonZeroUsize::new(CACHE_SIZE / 2).unwrap())),
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark, resize_benchmark);
criterion_main!(benches);
