//! Parallel chunked aggregation of `key;value` measurement files.
//!
//! The input buffer is split into line-aligned chunks
//! ([`planner::plan_chunks`]), each chunk is folded into its own
//! [`AggregateMap`] on a worker ([`chunk::aggregate_chunk`]), and the partial
//! maps are merged ([`reduce::merge_maps`]) before being rendered as a sorted
//! `{key=min/mean/max/count ...}` block ([`report::ReportFormatter`]).
//!
//! ```no_run
//! use one_brc::{Config, Engine};
//!
//! let engine = Engine::new(Config::new("measurements.txt"))?;
//! let summary = engine.run()?;
//! println!("{}", engine.formatter().render(&summary.aggregates));
//! # Ok::<(), one_brc::Error>(())
//! ```

pub mod aggregate;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod planner;
pub mod record;
pub mod reduce;
pub mod report;

pub use aggregate::{Aggregate, AggregateMap};
pub use chunk::{aggregate_chunk, ChunkSummary, RunStats};
pub use config::{Config, Executor};
pub use engine::Engine;
pub use error::{Error, RecordError, Result};
pub use input::MappedInput;
pub use planner::plan_chunks;
pub use record::{parse_record, Record};
pub use reduce::{merge_maps, reduce_summaries};
pub use report::{render, ReportFormatter};
