//! Read operations: leaf location, rank lookup, and height.

use crate::error::{IndexError, Result};
use crate::score_list::{ScoreList, UniversityEntry};
use crate::types::{DeptIndex, NodeId, NodeRef};

impl DeptIndex {
    /// Descend to the leaf whose key range covers `department`.
    ///
    /// Each branch routes to the child at index "count of keys less than or
    /// equal to `department`". Returns `None` only for an empty tree.
    pub(crate) fn find_leaf(&self, department: &str) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match current {
                NodeRef::Leaf(id) => return Some(id),
                NodeRef::Branch(id) => {
                    let branch = self.branch_arena.get(id)?;
                    current = branch.child_for(department);
                }
            }
        }
    }

    /// Borrow the score list for `department`, if indexed.
    pub fn scores(&self, department: &str) -> Option<&ScoreList> {
        let leaf_id = self.find_leaf(department)?;
        self.leaf_arena.get(leaf_id)?.list_for(department)
    }

    /// Returns true if `department` has at least one indexed record.
    pub fn contains_department(&self, department: &str) -> bool {
        self.scores(department).is_some()
    }

    /// Entry holding 1-based `rank` within `department`'s descending-score
    /// ranking.
    ///
    /// # Errors
    ///
    /// [`IndexError::DepartmentNotFound`] when the department is absent,
    /// [`IndexError::RankNotFound`] when the list is shorter than `rank`
    /// (or `rank` is 0).
    ///
    /// # Examples
    ///
    /// ```
    /// use deptindex::DeptIndex;
    ///
    /// let mut index = DeptIndex::new();
    /// index.insert("Math", "UniX", 88.0);
    /// index.insert("Math", "UniY", 80.0);
    /// index.insert("Math", "UniZ", 92.0);
    ///
    /// assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniZ");
    /// assert_eq!(index.lookup_by_rank("Math", 2).unwrap().university, "UniX");
    /// assert!(index.lookup_by_rank("Math", 4).is_err());
    /// ```
    pub fn lookup_by_rank(&self, department: &str, rank: usize) -> Result<&UniversityEntry> {
        let list = self
            .scores(department)
            .ok_or(IndexError::DepartmentNotFound)?;
        list.get(rank).ok_or(IndexError::RankNotFound { rank })
    }

    /// Point probe: find `university`'s entry within `department`.
    ///
    /// Linear over the department's list; used by the timing metric.
    pub fn lookup_university(&self, department: &str, university: &str) -> Option<&UniversityEntry> {
        self.scores(department)?
            .iter()
            .find(|entry| entry.university == university)
    }

    /// Tree height: internal hops along the leftmost spine plus one for the
    /// leaf level. 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut current = match self.root {
            Some(node) => node,
            None => return 0,
        };
        let mut height = 0;
        while let NodeRef::Branch(id) = current {
            height += 1;
            match self.branch_arena.get(id).and_then(|b| b.children.first()) {
                Some(child) => current = *child,
                None => break,
            }
        }
        height + 1
    }
}
