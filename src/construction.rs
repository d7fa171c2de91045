//! Construction and teardown for [`DeptIndex`].

use crate::arena::Arena;
use crate::metrics::Counters;
use crate::types::{DeptIndex, NULL_NODE};

impl DeptIndex {
    /// Create an empty index.
    ///
    /// The tree has no root (and height 0) until the first record arrives.
    ///
    /// # Examples
    ///
    /// ```
    /// use deptindex::DeptIndex;
    ///
    /// let index = DeptIndex::new();
    /// assert!(index.is_empty());
    /// assert_eq!(index.height(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            root: None,
            first_leaf: NULL_NODE,
            leaf_arena: Arena::new(),
            branch_arena: Arena::new(),
            counters: Counters::default(),
        }
    }

    /// Returns true if no department has been indexed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct departments in the index.
    pub fn department_count(&self) -> usize {
        self.departments().count()
    }

    /// Total number of indexed records across all departments.
    pub fn record_count(&self) -> usize {
        self.departments().map(|(_, list)| list.len()).sum()
    }

    /// Drop the whole tree at once: both arenas are released together, each
    /// leaf taking its score lists with it. Metrics counters survive.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();
        self.root = None;
        self.first_leaf = NULL_NODE;
    }
}

impl Default for DeptIndex {
    fn default() -> Self {
        Self::new()
    }
}
