//! Two-phase driver: parallel local accumulation, then one serialized merge.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use topn_core::Record;
use topn_select::{GlobalTopNMerger, InsertOutcome, LocalTopNAccumulator};

use crate::metrics::MetricsRegistry;
use crate::split::{byte_ranges, LineChunkReader};

#[derive(Debug, Clone)]
pub struct JobConfig {
    /// How many of the largest records to keep. Fixed before the job starts.
    pub top_n: usize,
}

/// Stream one partition through a local accumulator.
///
/// Any unparsable line aborts the whole job: skipping it could silently drop
/// a true top-N member.
fn accumulate<I>(top_n: usize, lines: I, metrics: &MetricsRegistry) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut local = LocalTopNAccumulator::new(top_n);
    for line in lines {
        let line = line.context("reading input line")?;
        let record = Record::parse(&line)?;
        metrics.inc_records_scanned(1);
        if local.process(record) == InsertOutcome::Admitted {
            metrics.inc_records_admitted(1);
        }
    }
    Ok(local.finish())
}

/// Phase 2: a single merger consumes the union of all local candidate sets.
/// Callers must pass the complete union; merging a partial prefix breaks the
/// composability guarantee.
fn merge(top_n: usize, locals: Vec<Vec<Record>>, metrics: &MetricsRegistry) -> Vec<Record> {
    let mut merger = GlobalTopNMerger::new(top_n);
    let mut candidates = 0u64;
    for record in locals.into_iter().flatten() {
        candidates += 1;
        merger.process(record);
    }
    metrics.inc_merge_candidates(candidates);
    let results = merger.finish();
    metrics.inc_results_emitted(results.len() as u64);
    info!(candidates, results = results.len(), "merge complete");
    results
}

fn join_partitions(handles: Vec<thread::ScopedJoinHandle<'_, Result<Vec<Record>>>>) -> Result<Vec<Vec<Record>>> {
    handles
        .into_iter()
        .enumerate()
        .map(|(idx, handle)| {
            handle
                .join()
                .map_err(|_| anyhow!("partition {idx} worker panicked"))?
                .with_context(|| format!("partition {idx} failed"))
        })
        .collect()
}

/// Run the pipeline over pre-partitioned in-memory lines. Used by tests and
/// small embedded jobs; the fan-out and barrier mirror [`run_over_file`].
pub fn run_over_lines(
    cfg: &JobConfig,
    partitions: Vec<Vec<String>>,
    metrics: &MetricsRegistry,
) -> Result<Vec<Record>> {
    let top_n = cfg.top_n;
    info!(top_n, partitions = partitions.len(), "starting local phase");
    let locals = thread::scope(|scope| {
        let handles = partitions
            .into_iter()
            .enumerate()
            .map(|(idx, lines)| {
                scope.spawn(move || -> Result<Vec<Record>> {
                    let candidates =
                        accumulate(top_n, lines.into_iter().map(Ok::<_, io::Error>), metrics)?;
                    metrics.inc_partitions_finished(1);
                    debug!(partition = idx, candidates = candidates.len(), "partition finished");
                    Ok(candidates)
                })
            })
            .collect();
        // Joining every worker is the phase barrier: the merger only ever
        // sees the complete union.
        join_partitions(handles)
    })?;
    Ok(merge(top_n, locals, metrics))
}

/// Run the pipeline over a file, split into `workers` byte ranges processed
/// by one thread each. Each worker owns its accumulator exclusively; the
/// partitions share nothing.
pub fn run_over_file(
    cfg: &JobConfig,
    workers: usize,
    path: &Path,
    metrics: &MetricsRegistry,
) -> Result<Vec<Record>> {
    let top_n = cfg.top_n;
    let len = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    let ranges = byte_ranges(len, workers);
    info!(top_n, workers = ranges.len(), bytes = len, "starting local phase");
    let locals = thread::scope(|scope| {
        let handles = ranges
            .into_iter()
            .enumerate()
            .map(|(idx, range)| {
                scope.spawn(move || -> Result<Vec<Record>> {
                    let file = File::open(path)
                        .with_context(|| format!("open {}", path.display()))?;
                    let reader = LineChunkReader::new(BufReader::new(file), range)?;
                    let candidates = accumulate(top_n, reader, metrics)?;
                    metrics.inc_partitions_finished(1);
                    debug!(partition = idx, candidates = candidates.len(), "partition finished");
                    Ok(candidates)
                })
            })
            .collect();
        join_partitions(handles)
    })?;
    Ok(merge(top_n, locals, metrics))
}
