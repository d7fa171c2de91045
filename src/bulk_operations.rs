//! Bulk loading: external sort followed by bottom-up tree assembly.
//!
//! The merged stream arrives in ascending department order, so the builder
//! never searches: it packs (department, list) pairs into leaves left to
//! right, then stacks branch levels over them until one root remains. The
//! result satisfies the same leaf/branch invariants as incremental
//! insertion, but leaves are packed to the eager-split threshold instead of
//! half-full.

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::info;

use crate::error::Result;
use crate::external_sort::{ExternalSorter, SortConfig};
use crate::reader::{RowReader, RunReader};
use crate::score_list::ScoreList;
use crate::types::{BranchNode, DeptIndex, LeafNode, NodeId, NodeRef, Record, MAX_KEYS, NULL_NODE};

impl DeptIndex {
    /// Bulk-load admission rows with the default memory bounds.
    ///
    /// See [`bulk_load_with`](DeptIndex::bulk_load_with).
    pub fn bulk_load<R: BufRead>(&mut self, input: R) -> Result<u64> {
        self.bulk_load_with(input, SortConfig::default())
    }

    /// Bulk-load admission rows: external-sort the input into runs, merge
    /// them, and rebuild the tree bottom-up from the sorted stream.
    ///
    /// Returns the number of records indexed. Replaces the index contents on
    /// success; any I/O failure aborts the load and leaves the existing tree
    /// untouched. Run files live in a scoped temporary directory and are
    /// removed whether the load succeeds or fails.
    pub fn bulk_load_with<R: BufRead>(&mut self, input: R, config: SortConfig) -> Result<u64> {
        let sorter = ExternalSorter::new(config);
        let run_dir = tempfile::tempdir()?;
        let mut reader = RowReader::new(input);

        let (runs, total) = sorter.create_runs(&mut reader, run_dir.path())?;
        if runs.is_empty() {
            info!("bulk load: no records in input");
            return Ok(0);
        }
        let merged = run_dir.path().join("sorted_data.tmp");
        sorter.merge_runs(&runs, &merged)?;

        // Build into a scratch index and swap on success, so a failure along
        // the way cannot leave this index half-replaced.
        let mut scratch = DeptIndex::new();
        scratch.counters = self.counters;
        {
            let mut builder = BulkBuilder::new(&mut scratch);
            let mut sorted = RunReader::new(BufReader::new(File::open(&merged)?));
            while let Some(record) = sorted.next_record()? {
                builder.push(record);
            }
            builder.finish();
        }
        *self = scratch;

        info!(
            records = total,
            runs = runs.len(),
            height = self.height(),
            skipped = reader.skipped_rows(),
            "bulk load complete"
        );
        Ok(total)
    }
}

// ============================================================================
// BULK BUILDER
// ============================================================================

/// Assembles a tree from a department-ordered record stream.
///
/// Groups contiguous same-department records into a [`ScoreList`] (the
/// sorted list insert re-imposes the score order the run comparator does not
/// guarantee), flushes each completed group into the current leaf, and seals
/// full leaves into the chain while collecting separator keys for the level
/// above.
pub(crate) struct BulkBuilder<'a> {
    index: &'a mut DeptIndex,
    current_leaf: NodeId,
    leaves: Vec<NodeId>,
    promoted: Vec<String>,
    current_dept: Option<String>,
    current_list: ScoreList,
}

impl<'a> BulkBuilder<'a> {
    pub(crate) fn new(index: &'a mut DeptIndex) -> Self {
        let first = index.alloc_leaf(LeafNode::new());
        index.first_leaf = first;
        index.root = Some(NodeRef::Leaf(first));
        Self {
            index,
            current_leaf: first,
            leaves: vec![first],
            promoted: Vec::new(),
            current_dept: None,
            current_list: ScoreList::new(),
        }
    }

    /// Feed the next record; must arrive in ascending department order.
    pub(crate) fn push(&mut self, record: Record) {
        if self
            .current_dept
            .as_deref()
            .is_some_and(|dept| dept != record.department)
        {
            self.flush_group();
        }
        self.index.counters.entry_allocations += 1;
        self.current_list.insert(record.university, record.score);
        self.current_dept = Some(record.department);
    }

    /// Flush the trailing group and build the branch levels.
    pub(crate) fn finish(mut self) {
        if self.current_dept.is_some() {
            self.flush_group();
        }
        let children: Vec<NodeRef> = self.leaves.iter().map(|id| NodeRef::Leaf(*id)).collect();
        let root = build_parent_level(self.index, children, self.promoted);
        self.index.root = Some(root);
    }

    /// Move the completed (department, list) pair into the current leaf,
    /// sealing and chaining a full leaf first.
    fn flush_group(&mut self) {
        let dept = self
            .current_dept
            .take()
            .expect("flush_group only called with an open group");
        let list = std::mem::take(&mut self.current_list);

        let full = self
            .index
            .leaf_arena
            .get(self.current_leaf)
            .map(|leaf| leaf.len() == MAX_KEYS)
            .unwrap_or(false);
        if full {
            self.index.counters.splits += 1;
            let new_leaf = self.index.alloc_leaf(LeafNode::new());
            if let Some(prev) = self.index.leaf_arena.get_mut(self.current_leaf) {
                prev.next = new_leaf;
            }
            // The sealed leaf's upper bound becomes the separator: it is the
            // first key of the leaf being opened.
            self.promoted.push(dept.clone());
            self.leaves.push(new_leaf);
            self.current_leaf = new_leaf;
        }
        if let Some(leaf) = self.index.leaf_arena.get_mut(self.current_leaf) {
            leaf.push_slot(dept, list);
        }
    }
}

/// Group `children` under new branches of at most `ORDER` children each,
/// left to right, then recurse on the branch level until one node remains.
/// `keys[i]` separates `children[i]` from `children[i + 1]`.
fn build_parent_level(
    index: &mut DeptIndex,
    children: Vec<NodeRef>,
    keys: Vec<String>,
) -> NodeRef {
    debug_assert_eq!(keys.len() + 1, children.len());
    if children.len() == 1 {
        let only = children[0];
        index.set_parent(only, NULL_NODE);
        return only;
    }

    let mut parents: Vec<NodeRef> = Vec::new();
    let mut next_keys: Vec<String> = Vec::new();
    let mut child_idx = 0;
    while child_idx < children.len() {
        let mut branch = BranchNode::new();
        branch.children.push(children[child_idx]);
        child_idx += 1;
        while branch.keys.len() < MAX_KEYS && child_idx < children.len() {
            branch.keys.push(keys[child_idx - 1].clone());
            branch.children.push(children[child_idx]);
            child_idx += 1;
        }

        let members = branch.children.clone();
        let branch_id = index.alloc_branch(branch);
        for member in members {
            index.set_parent(member, branch_id);
        }
        parents.push(NodeRef::Branch(branch_id));

        if child_idx < children.len() {
            // Another sibling branch follows; its leading separator moves up.
            index.counters.splits += 1;
            next_keys.push(keys[child_idx - 1].clone());
        }
    }
    build_parent_level(index, parents, next_keys)
}
