//! Simulation runner
//!
//! Replays one request trace against every configured cache and mode using a
//! read-through pattern: look the key up and admit it on a miss. Sequential
//! runs drive a `FifoCache` directly; concurrent runs split the trace
//! round-robin across worker threads sharing one `ConcurrentFifoCache`.

use std::collections::HashSet;
use std::thread;
use std::time::Instant;

use fifocache::metrics::CacheMetrics;
use fifocache::{ConcurrentFifoCache, FifoCache};

use crate::models::{
    CacheMode, CacheVariant, Request, RunStats, SimulationConfig, SimulationResult,
};

/// Wrapper enum for the cache implementations under test
enum CacheWrapper {
    Seq(FifoCache<String, u64>),
    Conc(ConcurrentFifoCache<String, u64>),
}

impl CacheWrapper {
    fn build(
        variant: &CacheVariant,
        mode: CacheMode,
        config: &SimulationConfig,
    ) -> anyhow::Result<Self> {
        let cache_config = variant.to_config(config.capacity);
        Ok(match mode {
            CacheMode::Sequential => CacheWrapper::Seq(FifoCache::try_init(cache_config, None)?),
            CacheMode::Concurrent => {
                CacheWrapper::Conc(ConcurrentFifoCache::try_init(cache_config, None)?)
            }
        })
    }

    fn metrics(&self) -> (&'static str, usize) {
        let (name, metrics) = match self {
            CacheWrapper::Seq(cache) => (cache.algorithm_name(), cache.metrics()),
            CacheWrapper::Conc(cache) => (cache.algorithm_name(), cache.metrics()),
        };
        let evictions = metrics.get("evictions").copied().unwrap_or_default() as usize;
        (name, evictions)
    }
}

/// Read-through access: returns `true` on a hit, admits the key on a miss.
///
/// The failed `get` already counts the miss in the cache metrics.
#[inline]
fn access_sequential(cache: &mut FifoCache<String, u64>, request: &Request) -> bool {
    if cache.get(request.key.as_str()).is_some() {
        return true;
    }
    cache.put(request.key.clone(), request.timestamp);
    false
}

#[inline]
fn access_concurrent(cache: &ConcurrentFifoCache<String, u64>, request: &Request) -> bool {
    if cache.get_with(request.key.as_str(), |_| ()).is_some() {
        return true;
    }
    cache.put(request.key.clone(), request.timestamp);
    false
}

/// Runs simulations over an in-memory trace
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Runs every variant in every mode over `requests`.
    pub fn run(&self, requests: &[Request]) -> anyhow::Result<SimulationResult> {
        let start = Instant::now();
        let unique_keys = requests
            .iter()
            .map(|r| r.key.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut runs = Vec::with_capacity(self.config.variants.len() * self.config.modes.len());
        for variant in &self.config.variants {
            for &mode in &self.config.modes {
                let run = self.run_one(variant, mode, requests)?;
                tracing::info!(
                    "[runner]: {} {}: hit rate {:.2}% in {:.2?}",
                    variant,
                    mode,
                    run.hit_rate() * 100.0,
                    run.duration
                );
                runs.push(run);
            }
        }

        Ok(SimulationResult {
            runs,
            total_requests: requests.len(),
            unique_keys,
            capacity: self.config.capacity.get(),
            duration: start.elapsed(),
        })
    }

    fn run_one(
        &self,
        variant: &CacheVariant,
        mode: CacheMode,
        requests: &[Request],
    ) -> anyhow::Result<RunStats> {
        let mut cache = CacheWrapper::build(variant, mode, &self.config)?;
        let start = Instant::now();

        let hits = match &mut cache {
            CacheWrapper::Seq(cache) => requests
                .iter()
                .filter(|request| access_sequential(cache, request))
                .count(),
            CacheWrapper::Conc(cache) => self.run_concurrent(cache, requests),
        };

        let duration = start.elapsed();
        let (algorithm, evictions) = cache.metrics();
        Ok(RunStats {
            variant: *variant,
            mode,
            algorithm,
            hits,
            misses: requests.len() - hits,
            evictions,
            duration,
        })
    }

    fn run_concurrent(
        &self,
        cache: &ConcurrentFifoCache<String, u64>,
        requests: &[Request],
    ) -> usize {
        let threads = self.config.thread_count.max(1);
        if threads == 1 {
            return requests
                .iter()
                .filter(|request| access_concurrent(cache, request))
                .count();
        }

        thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|worker| {
                    scope.spawn(move || {
                        requests
                            .iter()
                            .skip(worker)
                            .step_by(threads)
                            .filter(|request| access_concurrent(cache, request))
                            .count()
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .sum()
        })
    }
}
