//! Synthetic traffic generation
//!
//! Produces request traces where a configurable share of the traffic goes to a
//! small set of popular objects, with a Zipf-like skew inside that set, and
//! the rest is spread uniformly over the regular objects.

use crate::models::Request;
use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Zipf skewness inside the popular set
const ZIPF_S: f64 = 0.8;

/// Parameters for generating a synthetic trace
#[derive(Debug, Clone)]
pub struct TrafficConfig {
    /// Number of requests to generate
    pub requests: usize,
    /// Number of unique objects
    pub unique_objects: u32,
    /// Traffic distribution: percentage of traffic from popular objects
    pub popular_traffic_percent: u8,
    /// Percentage of objects considered "popular"
    pub popular_objects_percent: u8,
    /// Requests per second, used to space timestamps
    pub rps: u32,
    /// Timestamp of the first request
    pub start_time: u64,
    /// Seed for reproducible traces; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            unique_objects: 10_000,
            popular_traffic_percent: 80,
            popular_objects_percent: 20,
            rps: 100,
            start_time: 0,
            seed: None,
        }
    }
}

/// Generator for synthetic request traces
pub struct TrafficGenerator {
    config: TrafficConfig,
}

impl TrafficGenerator {
    /// Create a new generator, rejecting configurations that cannot produce traffic
    pub fn new(config: TrafficConfig) -> Result<Self> {
        ensure!(config.unique_objects > 0, "unique objects must be positive");
        ensure!(config.rps > 0, "requests per second must be positive");
        ensure!(
            config.popular_traffic_percent <= 100 && config.popular_objects_percent <= 100,
            "percentages must be between 0 and 100"
        );
        Ok(Self { config })
    }

    fn split_objects(&self) -> (u32, u32) {
        let total = self.config.unique_objects;
        let popular = ((total as f64 * self.config.popular_objects_percent as f64 / 100.0) as u32)
            .clamp(1, total);
        (popular, total - popular)
    }

    /// Generates the requests in memory.
    pub fn generate(&self) -> Vec<Request> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (popular_objects, regular_objects) = self.split_objects();
        let popular_probability = self.config.popular_traffic_percent as f64 / 100.0;
        let top_tier = (popular_objects / 10).max(1);

        let mut requests = Vec::with_capacity(self.config.requests);
        for i in 0..self.config.requests {
            let timestamp = self.config.start_time + (i as u64) / self.config.rps as u64;

            let is_popular = regular_objects == 0 || rng.gen::<f64>() < popular_probability;
            let key = if is_popular {
                let rank = rng.gen_range(0..popular_objects);
                let zipf_factor = 1.0 / ((rank + 1) as f64).powf(ZIPF_S);
                // Higher probability for the top tier of popular objects
                let index = if rng.gen::<f64>() < zipf_factor * 0.8 {
                    rank % top_tier
                } else {
                    rank
                };
                format!("popular_obj_{index}")
            } else {
                format!("regular_obj_{}", rng.gen_range(0..regular_objects))
            };

            requests.push(Request::new(timestamp, key));
        }

        tracing::info!(
            "[generator]: {} requests over {} popular and {} regular objects",
            requests.len(),
            popular_objects,
            regular_objects
        );
        requests
    }

    /// Generates the requests and writes them as CSV to `path`.
    pub fn write_csv(&self, path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(BufWriter::with_capacity(1 << 20, file));

        let requests = self.generate();
        for request in &requests {
            writer.serialize(request)?;
        }
        writer.flush()?;
        Ok(requests.len())
    }
}
