// Statistics reporting for cache simulation

use crate::models::{CacheMode, CsvResultRow, RunStats, SimulationResult};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

/// Report view over a finished simulation
pub struct SimulationStats<'a> {
    result: &'a SimulationResult,
}

impl<'a> SimulationStats<'a> {
    pub fn from_result(result: &'a SimulationResult) -> Self {
        Self { result }
    }

    /// Best run by hit rate; ties keep the earlier run.
    pub fn best(&self) -> Option<&'a RunStats> {
        self.result.runs.iter().fold(None, |best: Option<&RunStats>, run| match best {
            Some(b) if b.hit_rate() >= run.hit_rate() => Some(b),
            _ => Some(run),
        })
    }

    /// Print a summary of the simulation results to stdout
    pub fn print_summary(&self) -> io::Result<()> {
        self.write_summary(&mut io::stdout().lock())
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let result = self.result;
        writeln!(out, "\nCache Simulation Summary")?;
        writeln!(out, "========================")?;
        writeln!(out, "Total requests: {}", result.total_requests)?;
        writeln!(out, "Unique keys:    {}", result.unique_keys)?;
        writeln!(out, "Capacity:       {}", result.capacity)?;
        writeln!(out, "Wall time:      {:.3}s", result.duration.as_secs_f64())?;

        writeln!(out, "\nResults by Configuration and Mode:")?;
        writeln!(
            out,
            "{:<14} {:<11} {:<18} {:>10} {:>10} {:>8} {:>10} {:>10}",
            "Config", "Mode", "Algorithm", "Hits", "Misses", "HitRate", "Evictions", "Time"
        )?;
        writeln!(out, "{}", "-".repeat(98))?;

        for run in &result.runs {
            writeln!(
                out,
                "{:<14} {:<11} {:<18} {:>10} {:>10} {:>7.2}% {:>10} {:>9.3}s",
                run.variant.to_string(),
                run.mode.as_str(),
                run.algorithm,
                run.hits,
                run.misses,
                run.hit_rate() * 100.0,
                run.evictions,
                run.duration.as_secs_f64()
            )?;
        }

        if let Some(best) = self.best() {
            writeln!(
                out,
                "\nBest: {} ({}) at {:.2}%",
                best.variant,
                best.mode,
                best.hit_rate() * 100.0
            )?;
        }
        Ok(())
    }

    /// Print a comparison between sequential and concurrent modes
    pub fn print_comparison(&self) -> io::Result<()> {
        self.write_comparison(&mut io::stdout().lock())
    }

    pub fn write_comparison<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let runs = &self.result.runs;
        let pairs: Vec<_> = runs
            .iter()
            .filter(|run| run.mode == CacheMode::Sequential)
            .filter_map(|seq| {
                runs.iter()
                    .find(|run| run.mode == CacheMode::Concurrent && run.variant == seq.variant)
                    .map(|conc| (seq, conc))
            })
            .collect();
        if pairs.is_empty() {
            return Ok(());
        }

        writeln!(out, "\nHit-Rate Comparison: Sequential vs Concurrent")?;
        writeln!(
            out,
            "{:<14} {:>11} {:>11} {:>9}",
            "Config", "Sequential", "Concurrent", "Delta"
        )?;
        writeln!(out, "{}", "-".repeat(48))?;
        for (seq, conc) in pairs {
            let delta = (conc.hit_rate() - seq.hit_rate()) * 100.0;
            writeln!(
                out,
                "{:<14} {:>10.2}% {:>10.2}% {:>+8.2}%",
                seq.variant.to_string(),
                seq.hit_rate() * 100.0,
                conc.hit_rate() * 100.0,
                delta
            )?;
        }
        writeln!(
            out,
            "\nNote: concurrent runs interleave worker threads, so touch order and"
        )?;
        writeln!(out, "therefore eviction order can differ from the sequential replay.")?;
        Ok(())
    }

    /// Export results to a CSV file, one row per run
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer =
            csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
        for run in &self.result.runs {
            writer.serialize(CsvResultRow::from_run(run, self.result.capacity))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CacheVariant, TrackingMode};
    use std::time::Duration;

    fn run(tracking: TrackingMode, mode: CacheMode, hits: usize) -> RunStats {
        RunStats {
            variant: CacheVariant::new(tracking, 2.0),
            mode,
            algorithm: "FIFO-HANDICAP",
            hits,
            misses: 100 - hits,
            evictions: 7,
            duration: Duration::from_millis(12),
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            runs: vec![
                run(TrackingMode::Read, CacheMode::Sequential, 40),
                run(TrackingMode::Read, CacheMode::Concurrent, 38),
                run(TrackingMode::Both, CacheMode::Sequential, 55),
            ],
            total_requests: 100,
            unique_keys: 30,
            capacity: 10,
            duration: Duration::from_millis(50),
        }
    }

    #[test]
    fn test_best_run() {
        let result = result();
        let stats = SimulationStats::from_result(&result);
        let best = stats.best().unwrap();
        assert_eq!(best.variant.tracking, TrackingMode::Both);
        assert_eq!(best.hits, 55);
    }

    #[test]
    fn test_summary_lists_every_run() {
        let result = result();
        let mut out = Vec::new();
        SimulationStats::from_result(&result)
            .write_summary(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total requests: 100"));
        assert!(text.contains("readx2"));
        assert!(text.contains("bothx2"));
        assert!(text.contains("55.00%"));
        assert!(text.contains("Best: bothx2 (Sequential)"));
    }

    #[test]
    fn test_comparison_pairs_modes() {
        let result = result();
        let mut out = Vec::new();
        SimulationStats::from_result(&result)
            .write_comparison(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("-2.00%"));
        // `both` only ran sequentially
        assert!(!text.contains("bothx2"));
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let result = result();
        SimulationStats::from_result(&result)
            .export_csv(&path)
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "config");
        assert_eq!(&headers[7], "hit_rate");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "readx2");
        assert_eq!(&rows[1][1], "Concurrent");
        assert_eq!(&rows[2][5], "55");
    }
}
