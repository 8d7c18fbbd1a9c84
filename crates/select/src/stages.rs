use topn_core::Record;

use crate::set::{BoundedTopSet, InsertOutcome};

/// Phase-1 stage: streams one partition and retains at most N candidates.
///
/// One accumulator per partition, owned exclusively by its worker for the
/// lifetime of the stream. `finish` consumes the accumulator, so a finished
/// stage cannot be fed or drained again.
pub struct LocalTopNAccumulator {
    top: BoundedTopSet,
}

impl LocalTopNAccumulator {
    pub fn new(n: usize) -> Self {
        Self {
            top: BoundedTopSet::new(n),
        }
    }

    pub fn process(&mut self, record: Record) -> InsertOutcome {
        self.top.insert(record)
    }

    /// End of partition: emit the local candidates, largest first.
    pub fn finish(mut self) -> Vec<Record> {
        self.top.drain_descending().collect()
    }
}

/// Phase-2 stage: re-ranks the union of every partition's candidates.
///
/// Must run as a single serialized instance over the complete union; its
/// input is capped at partitions x N records, so the serial stage costs the
/// same no matter how large the original dataset was.
pub struct GlobalTopNMerger {
    top: BoundedTopSet,
}

impl GlobalTopNMerger {
    pub fn new(n: usize) -> Self {
        Self {
            top: BoundedTopSet::new(n),
        }
    }

    pub fn process(&mut self, record: Record) -> InsertOutcome {
        self.top.insert(record)
    }

    /// Final answer: min(N, records available), strictly descending by key.
    pub fn finish(mut self) -> Vec<Record> {
        self.top.drain_descending().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: i64) -> Record {
        Record {
            key,
            line: key.to_string(),
        }
    }

    fn run_pipeline(n: usize, partitions: &[&[i64]]) -> Vec<i64> {
        let mut merger = GlobalTopNMerger::new(n);
        for partition in partitions {
            let mut local = LocalTopNAccumulator::new(n);
            for &key in *partition {
                local.process(rec(key));
            }
            for candidate in local.finish() {
                merger.process(candidate);
            }
        }
        merger.finish().into_iter().map(|r| r.key).collect()
    }

    fn direct_top_n(n: usize, keys: &[i64]) -> Vec<i64> {
        let mut sorted = keys.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.truncate(n);
        sorted
    }

    #[test]
    fn single_partition_top_two() {
        assert_eq!(run_pipeline(2, &[&[5, 1, 9, 3]]), vec![9, 5]);
    }

    #[test]
    fn split_matches_unsplit() {
        let split = run_pipeline(2, &[&[5, 1], &[9, 3]]);
        let unsplit = run_pipeline(2, &[&[5, 1, 9, 3]]);
        assert_eq!(split, vec![9, 5]);
        assert_eq!(split, unsplit);
    }

    #[test]
    fn fewer_records_than_n_is_not_padded() {
        assert_eq!(run_pipeline(2, &[&[7]]), vec![7]);
    }

    #[test]
    fn duplicate_maxima_are_both_kept() {
        assert_eq!(run_pipeline(2, &[&[8, 8, 3]]), vec![8, 8]);
    }

    #[test]
    fn empty_partitions_contribute_nothing() {
        assert_eq!(run_pipeline(3, &[&[], &[4, 2], &[]]), vec![4, 2]);
    }

    #[test]
    fn any_partitioning_yields_the_global_answer() {
        let keys: Vec<i64> = vec![
            12, -3, 44, 44, 7, 0, 91, -52, 13, 28, 91, 5, -1, 60, 33, 17, 2, 80, 80, 9,
        ];
        let expected = direct_top_n(4, &keys);
        let splits: [&[usize]; 4] = [&[20], &[10, 10], &[1, 6, 13], &[5, 5, 5, 5]];
        for sizes in splits {
            let mut partitions: Vec<&[i64]> = Vec::new();
            let mut offset = 0;
            for &size in sizes {
                partitions.push(&keys[offset..offset + size]);
                offset += size;
            }
            assert_eq!(run_pipeline(4, &partitions), expected, "split {sizes:?}");
        }
    }

    #[test]
    fn merger_needs_the_full_union() {
        // Looking at only the first partition's candidates misses the true
        // maximum; the complete union recovers it.
        let mut p1 = LocalTopNAccumulator::new(2);
        for key in [5, 1] {
            p1.process(rec(key));
        }
        let mut p2 = LocalTopNAccumulator::new(2);
        for key in [9, 3] {
            p2.process(rec(key));
        }
        let first = p1.finish();
        let second = p2.finish();

        let mut partial = GlobalTopNMerger::new(2);
        for candidate in first.clone() {
            partial.process(candidate);
        }
        let partial_keys: Vec<i64> = partial.finish().into_iter().map(|r| r.key).collect();
        assert_eq!(partial_keys, vec![5, 1]);

        let mut full = GlobalTopNMerger::new(2);
        for candidate in first.into_iter().chain(second) {
            full.process(candidate);
        }
        let full_keys: Vec<i64> = full.finish().into_iter().map(|r| r.key).collect();
        assert_eq!(full_keys, vec![9, 5]);
    }

    #[test]
    fn payloads_survive_both_phases_verbatim() {
        let mut local = LocalTopNAccumulator::new(1);
        local.process(Record {
            key: 42,
            line: " 42 ".to_string(),
        });
        let mut merger = GlobalTopNMerger::new(1);
        for candidate in local.finish() {
            merger.process(candidate);
        }
        let out = merger.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line, " 42 ");
    }
}
