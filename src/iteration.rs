//! Ordered iteration over the leaf chain.

use crate::score_list::ScoreList;
use crate::types::{DeptIndex, NodeId};

impl DeptIndex {
    /// Iterate `(department, score list)` pairs in ascending department
    /// order, walking the leaf chain from the leftmost leaf.
    pub fn departments(&self) -> Departments<'_> {
        Departments {
            index: self,
            leaf: self.first_leaf,
            slot: 0,
        }
    }
}

/// Iterator over all departments via the leaf sibling chain.
pub struct Departments<'a> {
    index: &'a DeptIndex,
    leaf: NodeId,
    slot: usize,
}

impl<'a> Iterator for Departments<'a> {
    type Item = (&'a str, &'a ScoreList);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.index.leaf_arena.get(self.leaf)?;
            if self.slot < leaf.keys.len() {
                let slot = self.slot;
                self.slot += 1;
                return Some((leaf.keys[slot].as_str(), &leaf.lists[slot]));
            }
            self.leaf = leaf.next;
            self.slot = 0;
        }
    }
}
