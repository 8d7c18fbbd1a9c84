//! Bounded top-N selection: the fixed-capacity set and the two pipeline
//! stages built on it.
//!
//! The same selection logic runs twice: once per input partition
//! ([`LocalTopNAccumulator`]) and once over the union of all partition
//! candidates ([`GlobalTopNMerger`]). Because every true global top-N record
//! is by definition in some partition's local top-N, re-ranking the pooled
//! candidates recovers the exact global answer under any input split.

pub mod set;
pub mod stages;

pub use set::{BoundedTopSet, InsertOutcome};
pub use stages::{GlobalTopNMerger, LocalTopNAccumulator};
