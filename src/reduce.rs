//! Folding chunk results into one global result.

use crate::aggregate::AggregateMap;
use crate::chunk::{ChunkSummary, RunStats};

/// Merges any number of chunk maps. Keys that appear in only one map are
/// moved over unchanged.
pub fn merge_maps<I>(maps: I) -> AggregateMap
where
    I: IntoIterator<Item = AggregateMap>,
{
    maps.into_iter().fold(AggregateMap::new(), AggregateMap::merge)
}

/// Merges chunk summaries, summing their counters along the way.
pub fn reduce_summaries<I>(summaries: I) -> ChunkSummary
where
    I: IntoIterator<Item = ChunkSummary>,
{
    let mut stats = RunStats::default();
    let aggregates = merge_maps(summaries.into_iter().map(|summary| {
        stats += summary.stats;
        summary.aggregates
    }));
    ChunkSummary { aggregates, stats }
}
