// Data models for cache simulation

use fifocache::config::FifoCacheConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

/// A single cache request, one row of a trace file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unix timestamp of the request in seconds
    pub timestamp: u64,
    /// Cache key
    pub key: String,
}

impl Request {
    pub fn new(timestamp: u64, key: impl Into<String>) -> Self {
        Self {
            timestamp,
            key: key.into(),
        }
    }
}

/// Which events count as touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackingMode {
    /// Nothing is tracked, plain FIFO
    Fifo,
    /// Reads touch
    Read,
    /// Re-inserts touch
    Insert,
    /// Reads and re-inserts touch
    Both,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingMode::Fifo => "fifo",
            TrackingMode::Read => "read",
            TrackingMode::Insert => "insert",
            TrackingMode::Both => "both",
        }
    }

    /// Get all tracking modes
    pub fn all() -> Vec<TrackingMode> {
        vec![
            TrackingMode::Fifo,
            TrackingMode::Read,
            TrackingMode::Insert,
            TrackingMode::Both,
        ]
    }

    fn flags(&self) -> (bool, bool) {
        match self {
            TrackingMode::Fifo => (false, false),
            TrackingMode::Read => (false, true),
            TrackingMode::Insert => (true, false),
            TrackingMode::Both => (true, true),
        }
    }
}

impl FromStr for TrackingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fifo" | "pure" => Ok(TrackingMode::Fifo),
            "read" | "dynamic" => Ok(TrackingMode::Read),
            "insert" => Ok(TrackingMode::Insert),
            "both" => Ok(TrackingMode::Both),
            other => Err(format!("unknown tracking mode '{other}'")),
        }
    }
}

/// One cache configuration to simulate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheVariant {
    pub tracking: TrackingMode,
    pub handicap_factor: f64,
}

impl CacheVariant {
    pub fn new(tracking: TrackingMode, handicap_factor: f64) -> Self {
        Self {
            tracking,
            handicap_factor,
        }
    }

    /// Builds the library configuration for this variant.
    pub fn to_config(&self, capacity: NonZeroUsize) -> FifoCacheConfig {
        let (track_on_insert, track_on_read) = self.tracking.flags();
        FifoCacheConfig {
            track_on_insert,
            track_on_read,
            handicap_factor: self.handicap_factor,
            ..FifoCacheConfig::new(capacity)
        }
    }

    /// Expands tracking modes and factors into the list of variants to run.
    ///
    /// The factor only matters when something is tracked, so `fifo` is run
    /// once regardless of the factor list.
    pub fn expand(modes: &[TrackingMode], factors: &[f64]) -> Vec<CacheVariant> {
        let mut variants = Vec::new();
        for &tracking in modes {
            if tracking == TrackingMode::Fifo {
                variants.push(CacheVariant::new(tracking, 0.0));
                continue;
            }
            for &factor in factors {
                variants.push(CacheVariant::new(tracking, factor));
            }
        }
        variants
    }
}

impl fmt::Display for CacheVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tracking == TrackingMode::Fifo || self.handicap_factor == 0.0 {
            write!(f, "{}", self.tracking.as_str())
        } else {
            write!(f, "{}x{}", self.tracking.as_str(), self.handicap_factor)
        }
    }
}

/// Cache execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheMode {
    /// Single-threaded `FifoCache`
    Sequential,
    /// `ConcurrentFifoCache` driven by worker threads
    Concurrent,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Sequential => "Sequential",
            CacheMode::Concurrent => "Concurrent",
        }
    }

    /// Parses a mode selector; `both` expands to every mode.
    pub fn parse_list(mode: &str) -> Option<Vec<CacheMode>> {
        match mode.to_lowercase().as_str() {
            "sequential" | "seq" => Some(vec![CacheMode::Sequential]),
            "concurrent" | "conc" => Some(vec![CacheMode::Concurrent]),
            "both" | "all" => Some(vec![CacheMode::Sequential, CacheMode::Concurrent]),
            _ => None,
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Cache capacity in entries
    pub capacity: NonZeroUsize,
    /// Cache configurations to compare
    pub variants: Vec<CacheVariant>,
    /// Execution modes
    pub modes: Vec<CacheMode>,
    /// Worker threads for the concurrent mode
    pub thread_count: usize,
}

/// Statistics for one configuration in one mode
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub variant: CacheVariant,
    pub mode: CacheMode,
    pub algorithm: &'static str,
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub duration: Duration,
}

impl RunStats {
    pub fn requests(&self) -> usize {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Result of a whole simulation
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// One entry per configuration and mode, in run order
    pub runs: Vec<RunStats>,
    pub total_requests: usize,
    pub unique_keys: usize,
    pub capacity: usize,
    pub duration: Duration,
}

/// CSV row format for exporting simulation results
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub config: String,
    pub mode: String,
    pub algorithm: String,
    pub capacity: usize,
    pub requests: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub evictions: usize,
    pub time_ms: u128,
}

impl CsvResultRow {
    pub fn from_run(run: &RunStats, capacity: usize) -> Self {
        Self {
            config: run.variant.to_string(),
            mode: run.mode.to_string(),
            algorithm: run.algorithm.to_string(),
            capacity,
            requests: run.requests(),
            hits: run.hits,
            misses: run.misses,
            hit_rate: run.hit_rate(),
            evictions: run.evictions,
            time_ms: run.duration.as_millis(),
        }
    }
}
