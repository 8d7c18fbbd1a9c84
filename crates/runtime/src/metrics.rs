use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    records_scanned: AtomicU64,
    records_admitted: AtomicU64,
    partitions_finished: AtomicU64,
    merge_candidates: AtomicU64,
    results_emitted: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_records_scanned(&self, delta: u64) {
        self.inner.records_scanned.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_records_admitted(&self, delta: u64) {
        self.inner.records_admitted.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_partitions_finished(&self, delta: u64) {
        self.inner
            .partitions_finished
            .fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_merge_candidates(&self, delta: u64) {
        self.inner
            .merge_candidates
            .fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_results_emitted(&self, delta: u64) {
        self.inner.results_emitted.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_scanned: self.inner.records_scanned.load(Ordering::Relaxed),
            records_admitted: self.inner.records_admitted.load(Ordering::Relaxed),
            partitions_finished: self.inner.partitions_finished.load(Ordering::Relaxed),
            merge_candidates: self.inner.merge_candidates.load(Ordering::Relaxed),
            results_emitted: self.inner.results_emitted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    pub records_scanned: u64,
    pub records_admitted: u64,
    pub partitions_finished: u64,
    pub merge_candidates: u64,
    pub results_emitted: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            records_scanned: u64,
            records_admitted: u64,
            partitions_finished: u64,
            merge_candidates: u64,
            results_emitted: u64,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            records_scanned: self.records_scanned,
            records_admitted: self.records_admitted,
            partitions_finished: self.partitions_finished,
            merge_candidates: self.merge_candidates,
            results_emitted: self.results_emitted,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct JobTimer {
    start: Instant,
}

impl JobTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
