use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use topn_core::{Key, Record};

/// Result of offering a record to a [`BoundedTopSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record is now held by the set (possibly evicting the previous
    /// minimum).
    Admitted,
    /// The record was not large enough to enter a full set. Not an error.
    Rejected,
}

/// Heap entry: key first, then insertion sequence so ordering among equal
/// keys is total and deterministic.
#[derive(Debug)]
struct Entry {
    key: Key,
    seq: u64,
    record: Record,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Among equal keys the newest entry ranks lowest, so eviction drops
        // the newest duplicate and earlier-inserted records survive (FIFO).
        self.key
            .cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for Entry {}

/// Fixed-capacity container holding the N largest-keyed records seen so far.
///
/// A min-heap over the retained entries makes both the membership test and
/// the eviction O(log N). Memory is O(N) no matter how long the input stream
/// runs.
#[derive(Debug)]
pub struct BoundedTopSet {
    cap: usize,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Entry>>,
}

impl BoundedTopSet {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            next_seq: 0,
            heap: BinaryHeap::with_capacity(cap),
        }
    }

    /// Offer a record; keeps it only if it ranks among the largest `cap` seen.
    pub fn insert(&mut self, record: Record) -> InsertOutcome {
        let entry = Entry {
            key: record.key,
            seq: self.next_seq,
            record,
        };
        self.next_seq += 1;

        let outcome = if self.heap.len() < self.cap {
            self.heap.push(Reverse(entry));
            InsertOutcome::Admitted
        } else {
            match self.heap.peek() {
                Some(Reverse(min)) if entry > *min => {
                    self.heap.pop();
                    self.heap.push(Reverse(entry));
                    InsertOutcome::Admitted
                }
                _ => InsertOutcome::Rejected,
            }
        };
        assert!(
            self.heap.len() <= self.cap,
            "bounded top set grew past capacity {}",
            self.cap
        );
        outcome
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain all held records, largest key first; equal keys emerge in
    /// insertion order. One-shot: the set is empty afterwards.
    pub fn drain_descending(&mut self) -> impl Iterator<Item = Record> {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        entries.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|Reverse(entry)| entry.record)
    }
}
