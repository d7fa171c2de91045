//! Metrics: structural counters, the static memory model, and timed probes.
//!
//! Counters are cumulative since construction or the last
//! [`reset_metrics`](DeptIndex::reset_metrics); they are an accounting model
//! over allocation events, not live introspection of the tree.

use std::time::{Duration, Instant};

use crate::score_list;
use crate::types::{BranchNode, DeptIndex, LeafNode};

/// Cumulative allocation and split counters.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    pub(crate) splits: u64,
    pub(crate) leaf_allocations: u64,
    pub(crate) branch_allocations: u64,
    pub(crate) entry_allocations: u64,
}

impl DeptIndex {
    /// Node splits since the last reset (both load paths count splits).
    pub fn split_count(&self) -> u64 {
        self.counters.splits
    }

    /// Leaf plus branch nodes allocated since the last reset.
    pub fn node_allocations(&self) -> u64 {
        self.counters.leaf_allocations + self.counters.branch_allocations
    }

    /// Score-list entries allocated since the last reset.
    pub fn entry_allocations(&self) -> u64 {
        self.counters.entry_allocations
    }

    /// Zero all counters. The tree itself is untouched.
    pub fn reset_metrics(&mut self) {
        self.counters = Counters::default();
    }

    /// Estimated memory footprint in bytes:
    /// `nodes * sizeof(node) + entries * sizeof(entry)`.
    pub fn memory_estimate_bytes(&self) -> usize {
        self.counters.leaf_allocations as usize * std::mem::size_of::<LeafNode>()
            + self.counters.branch_allocations as usize * std::mem::size_of::<BranchNode>()
            + self.counters.entry_allocations as usize * score_list::entry_footprint()
    }

    /// Measured mean latency of one `(department, university)` point probe.
    ///
    /// Returns `None` when `probes` is empty.
    pub fn average_probe_time<'a>(
        &self,
        probes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Option<Duration> {
        let start = Instant::now();
        let mut count = 0u32;
        for (department, university) in probes {
            let _ = self.lookup_university(department, university);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(start.elapsed() / count)
    }
}
