use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use one_brc::config::{DEFAULT_CHUNK_COUNT, DEFAULT_MIN_CHUNK_BYTES};
use one_brc::report::DEFAULT_PRECISION;
use one_brc::{Config, Engine, Executor};

#[derive(Parser)]
#[command(name = "one-brc", version, about = "Per-station min/mean/max over a key;value file")]
struct Cli {
    /// Measurements file, one `key;value` record per line
    #[arg(env = "BRC_INPUT", default_value = "measurements.txt")]
    input: PathBuf,

    /// Target number of chunks
    #[arg(short, long, env = "BRC_CHUNK_COUNT", default_value_t = DEFAULT_CHUNK_COUNT)]
    chunk_count: usize,

    /// Chunk stride used when the file is smaller than the chunk count
    #[arg(long, env = "BRC_MIN_CHUNK_BYTES", default_value_t = DEFAULT_MIN_CHUNK_BYTES)]
    min_chunk_bytes: usize,

    /// Worker threads (0 = one per core)
    #[arg(short, long, env = "BRC_THREADS", default_value_t = 0)]
    threads: usize,

    /// Scheduler for chunk tasks: rayon or threads
    #[arg(short, long, env = "BRC_EXECUTOR", default_value = "rayon")]
    executor: Executor,

    /// Decimal places in the report
    #[arg(long, env = "BRC_PRECISION", default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only log errors unless RUST_LOG says otherwise
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::new(&self.input)
            .with_chunk_count(self.chunk_count)
            .with_min_chunk_bytes(self.min_chunk_bytes)
            .with_threads(self.threads)
            .with_executor(self.executor)
            .with_precision(self.precision)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let start = Instant::now();
    let engine = Engine::new(cli.config()).context("invalid configuration")?;
    let summary = engine
        .run()
        .with_context(|| format!("failed to aggregate {}", cli.input.display()))?;

    let formatter = engine.formatter();
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            formatter.write_to(&summary.aggregates, BufWriter::new(file))?;
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            formatter.write_to(&summary.aggregates, &mut out)?;
            writeln!(out)?;
        }
    }

    info!(
        lines = summary.stats.lines(),
        records = summary.stats.records,
        skipped = summary.stats.skipped,
        chunks = summary.stats.chunks,
        keys = summary.aggregates.len(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "done"
    );
    Ok(())
}
