//! Run configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::report::DEFAULT_PRECISION;

pub const DEFAULT_CHUNK_COUNT: usize = 10_000;
pub const DEFAULT_MIN_CHUNK_BYTES: usize = 1000;

/// How chunk tasks are scheduled onto worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Executor {
    /// A rayon thread pool maps chunks in parallel.
    #[default]
    Rayon,
    /// Scoped OS threads pull chunk jobs from a shared channel.
    Threads,
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executor::Rayon => f.write_str("rayon"),
            Executor::Threads => f.write_str("threads"),
        }
    }
}

impl FromStr for Executor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rayon" => Ok(Executor::Rayon),
            "threads" => Ok(Executor::Threads),
            other => Err(Error::InvalidConfig(format!("unknown executor {other:?}"))),
        }
    }
}

/// Settings consumed by [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read.
    pub input_path: PathBuf,
    /// Target number of chunks.
    /// Default: 10 000
    pub chunk_count: usize,
    /// Stride used when `len / chunk_count` rounds down to zero.
    /// Default: 1000
    pub min_chunk_bytes: usize,
    /// Worker threads. 0 means one per available core.
    /// Default: 0
    pub threads: usize,
    pub executor: Executor,
    /// Decimal places in the report.
    /// Default: 1
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("measurements.txt"),
            chunk_count: DEFAULT_CHUNK_COUNT,
            min_chunk_bytes: DEFAULT_MIN_CHUNK_BYTES,
            threads: 0,
            executor: Executor::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Config {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn with_chunk_count(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }

    pub fn with_min_chunk_bytes(mut self, min_chunk_bytes: usize) -> Self {
        self.min_chunk_bytes = min_chunk_bytes;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Worker count after resolving 0 to the available parallelism.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.threads
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_count == 0 {
            return Err(Error::InvalidConfig("chunk_count must be at least 1".into()));
        }
        if self.min_chunk_bytes == 0 {
            return Err(Error::InvalidConfig(
                "min_chunk_bytes must be at least 1".into(),
            ));
        }
        if self.precision > 17 {
            return Err(Error::InvalidConfig(format!(
                "precision {} is beyond f64 resolution",
                self.precision
            )));
        }
        Ok(())
    }
}
