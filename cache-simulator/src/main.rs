use anyhow::{bail, Context, Result};
use cache_simulator::generator::{TrafficConfig, TrafficGenerator};
use cache_simulator::input::read_trace;
use cache_simulator::models::{CacheMode, CacheVariant, SimulationConfig, TrackingMode};
use cache_simulator::runner::SimulationRunner;
use cache_simulator::stats::SimulationStats;
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// FIFO cache simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Shape of a synthetic workload
#[derive(Args, Debug, Clone)]
struct WorkloadArgs {
    /// Number of requests
    #[arg(long, default_value = "100000")]
    requests: usize,

    /// Number of unique objects
    #[arg(long, default_value = "10000")]
    objects: u32,

    /// Percentage of traffic from popular objects
    #[arg(long, default_value = "80")]
    popular_traffic: u8,

    /// Percentage of objects that are popular
    #[arg(long, default_value = "20")]
    popular_objects: u8,

    /// Requests per second, spaces the timestamps
    #[arg(long, default_value = "100")]
    rps: u32,

    /// Seed for a reproducible workload
    #[arg(long)]
    seed: Option<u64>,
}

impl WorkloadArgs {
    fn traffic_config(&self) -> TrafficConfig {
        TrafficConfig {
            requests: self.requests,
            unique_objects: self.objects,
            popular_traffic_percent: self.popular_traffic,
            popular_objects_percent: self.popular_objects,
            rps: self.rps,
            start_time: 0,
            seed: self.seed,
        }
    }
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a synthetic trace as CSV
    Generate {
        /// Output file
        #[arg(short, long, default_value = "traffic_logs/trace.csv")]
        output: PathBuf,

        #[command(flatten)]
        workload: WorkloadArgs,
    },

    /// Replay a trace against several cache configurations
    Simulate {
        /// CSV trace file or directory of CSV files; a synthetic workload is
        /// generated when omitted
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Cache capacity (number of entries)
        #[arg(short, long, default_value = "1000")]
        capacity: usize,

        /// Tracking modes to simulate (fifo, read, insert, both)
        #[arg(
            short,
            long,
            value_name = "MODES",
            value_delimiter = ',',
            default_value = "fifo,read,insert,both"
        )]
        tracking: Vec<TrackingMode>,

        /// Handicap factors combined with every tracking mode except fifo
        #[arg(
            short,
            long,
            value_name = "FACTORS",
            value_delimiter = ',',
            default_value = "0,2"
        )]
        factors: Vec<f64>,

        /// Cache mode: sequential, concurrent, or both
        #[arg(long, default_value = "sequential")]
        mode: String,

        /// Worker threads for the concurrent mode
        #[arg(long, default_value = "1")]
        threads: usize,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,

        #[command(flatten)]
        workload: WorkloadArgs,
    },
}

fn init_logger() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    match Cli::parse().command {
        Commands::Generate { output, workload } => {
            let generator = TrafficGenerator::new(workload.traffic_config())?;
            let written = generator.write_csv(&output)?;
            println!("Wrote {written} requests to {}", output.display());
        }
        Commands::Simulate {
            input,
            capacity,
            tracking,
            factors,
            mode,
            threads,
            output_csv,
            workload,
        } => {
            let Some(capacity) = NonZeroUsize::new(capacity) else {
                bail!("capacity must be positive");
            };
            let Some(modes) = CacheMode::parse_list(&mode) else {
                bail!("unknown mode '{mode}', expected sequential, concurrent or both");
            };
            let variants = CacheVariant::expand(&tracking, &factors);
            if variants.is_empty() {
                bail!("no cache configurations selected");
            }

            let requests = match &input {
                Some(path) => read_trace(path)
                    .with_context(|| format!("loading trace {}", path.display()))?,
                None => TrafficGenerator::new(workload.traffic_config())?.generate(),
            };

            println!("Cache Simulation");
            println!("================");
            match &input {
                Some(path) => println!("Input: {}", path.display()),
                None => println!("Input: synthetic workload"),
            }
            println!("Cache capacity: {capacity} entries");
            println!(
                "Configurations: {}",
                variants.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            if modes.contains(&CacheMode::Concurrent) {
                println!("Worker threads: {threads}");
            }

            let runner = SimulationRunner::new(SimulationConfig {
                capacity,
                variants,
                modes,
                thread_count: threads,
            });
            let result = runner.run(&requests)?;

            let stats = SimulationStats::from_result(&result);
            stats.print_summary()?;
            stats.print_comparison()?;

            if let Some(csv_path) = output_csv {
                stats.export_csv(&csv_path)?;
                println!("\nResults exported to: {}", csv_path.display());
            }
        }
    }
    Ok(())
}
