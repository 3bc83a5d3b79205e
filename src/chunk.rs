//! Aggregation of one line-aligned chunk.

use std::ops::AddAssign;

use tracing::warn;

use crate::aggregate::AggregateMap;
use crate::planner::NEWLINE;
use crate::record::parse_record;

/// Line counters produced by each chunk task and summed by the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub chunks: u64,
    pub records: u64,
    pub skipped: u64,
}

impl RunStats {
    /// Non-empty lines seen, valid or not.
    pub fn lines(&self) -> u64 {
        self.records + self.skipped
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, rhs: Self) {
        self.chunks += rhs.chunks;
        self.records += rhs.records;
        self.skipped += rhs.skipped;
    }
}

/// Everything one chunk task hands back to the coordinator.
#[derive(Debug, Clone, Default)]
pub struct ChunkSummary {
    pub aggregates: AggregateMap,
    pub stats: RunStats,
}

/// Parses every line in `span` and folds the valid ones into a fresh map.
///
/// Empty lines are ignored. Lines that fail to parse are logged and counted
/// in `stats.skipped`; they never abort the chunk.
pub fn aggregate_chunk(span: &[u8]) -> ChunkSummary {
    let mut aggregates = AggregateMap::new();
    let mut stats = RunStats {
        chunks: 1,
        ..RunStats::default()
    };

    let mut start = 0;
    for end in memchr::memchr_iter(NEWLINE, span).chain([span.len()]) {
        let line = &span[start..end];
        start = end + 1;
        if line.is_empty() {
            continue;
        }

        match parse_record(line) {
            Ok(rec) => {
                aggregates.record(rec.key, rec.value);
                stats.records += 1;
            }
            Err(err) => {
                warn!(error = %err, line = %String::from_utf8_lossy(line), "skipping line");
                stats.skipped += 1;
            }
        }
    }

    ChunkSummary { aggregates, stats }
}
