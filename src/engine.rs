//! Coordinator: plan, fan out, join, reduce.

use std::ops::Range;
use std::thread;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::chunk::{aggregate_chunk, ChunkSummary};
use crate::config::{Config, Executor};
use crate::error::Result;
use crate::input::MappedInput;
use crate::planner::plan_chunks;
use crate::reduce::reduce_summaries;
use crate::report::ReportFormatter;

pub struct Engine {
    config: Config,
    pool: Option<ThreadPool>,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let pool = match config.executor {
            Executor::Rayon => Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.threads)
                    .thread_name(|i| format!("brc-worker-{i}"))
                    .build()?,
            ),
            Executor::Threads => None,
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn formatter(&self) -> ReportFormatter {
        ReportFormatter::new(self.config.precision)
    }

    /// Maps the configured input file, aggregates it and releases the mapping.
    pub fn run(&self) -> Result<ChunkSummary> {
        let input = MappedInput::open(&self.config.input_path)?;
        let summary = self.aggregate(input.as_bytes());
        // The summary owns all of its keys, so the mapping can go now.
        input.release();
        Ok(summary)
    }

    /// Aggregates an in-memory buffer. Every chunk task finishes before the
    /// reduction starts.
    pub fn aggregate(&self, buf: &[u8]) -> ChunkSummary {
        let started = Instant::now();
        let chunks = plan_chunks(buf, self.config.chunk_count, self.config.min_chunk_bytes);

        let partials = match &self.pool {
            Some(pool) => run_on_pool(pool, buf, &chunks),
            None => run_on_threads(self.config.effective_threads(), buf, &chunks),
        };
        let fanned_out = started.elapsed();

        let summary = reduce_summaries(partials);
        debug!(
            executor = %self.config.executor,
            chunks = chunks.len(),
            keys = summary.aggregates.len(),
            aggregate_ms = u64::try_from(fanned_out.as_millis()).unwrap_or(u64::MAX),
            total_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "aggregated buffer"
        );
        summary
    }
}

fn run_on_pool(pool: &ThreadPool, buf: &[u8], chunks: &[Range<usize>]) -> Vec<ChunkSummary> {
    pool.install(|| {
        chunks
            .par_iter()
            .map(|range| aggregate_chunk(&buf[range.clone()]))
            .collect()
    })
}

fn run_on_threads(workers: usize, buf: &[u8], chunks: &[Range<usize>]) -> Vec<ChunkSummary> {
    let workers = workers.clamp(1, chunks.len().max(1));
    let (tx, rx) = crossbeam_channel::unbounded::<(usize, Range<usize>)>();
    for job in chunks.iter().cloned().enumerate() {
        // rx is alive until the end of this function, so send cannot fail.
        let _ = tx.send(job);
    }
    drop(tx);

    let mut done: Vec<(usize, ChunkSummary)> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let rx = rx.clone();
                thread::Builder::new()
                    .name(format!("brc-worker-{i}"))
                    .spawn_scoped(s, move || {
                        rx.into_iter()
                            .map(|(idx, range)| (idx, aggregate_chunk(&buf[range])))
                            .collect::<Vec<_>>()
                    })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|spawned| match spawned {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
                Err(err) => {
                    warn!(error = %err, "worker thread failed to spawn");
                    Vec::new()
                }
            })
            .collect()
    });

    // A worker that failed to spawn leaves its jobs in the queue; drain them here.
    done.extend(
        rx.try_iter()
            .map(|(idx, range)| (idx, aggregate_chunk(&buf[range]))),
    );

    done.sort_unstable_by_key(|(idx, _)| *idx);
    done.into_iter().map(|(_, summary)| summary).collect()
}
