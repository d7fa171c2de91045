//! Structural invariant checks.
//!
//! Valid inputs cannot violate these invariants, so nothing here runs on the
//! insert or query paths; tests call [`check_invariants`] after structural
//! churn to catch programming defects.

use crate::error::{IndexError, Result};
use crate::types::{DeptIndex, NodeId, NodeRef, NULL_NODE};

impl DeptIndex {
    /// Verify the full set of structural invariants:
    /// equal leaf depth, strictly increasing keys within every node and
    /// across the leaf chain, branch key/child arity, separator bounds,
    /// parent back-references, and leaf-chain completeness.
    pub fn check_invariants(&self) -> Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => {
                if self.first_leaf != NULL_NODE {
                    return Err(corrupted("empty tree still has a first leaf"));
                }
                return Ok(());
            }
        };

        if self.parent_of(root) != NULL_NODE {
            return Err(corrupted("root has a parent back-reference"));
        }

        let mut leaf_depths = Vec::new();
        let mut tree_leaves = Vec::new();
        self.check_node(root, None, None, 0, &mut leaf_depths, &mut tree_leaves)?;

        if let Some(first_depth) = leaf_depths.first() {
            if leaf_depths.iter().any(|depth| depth != first_depth) {
                return Err(corrupted("leaves at unequal depths"));
            }
        }

        self.check_leaf_chain(&tree_leaves)
    }

    fn check_node(
        &self,
        node: NodeRef,
        lower: Option<&str>,
        upper: Option<&str>,
        depth: usize,
        leaf_depths: &mut Vec<usize>,
        tree_leaves: &mut Vec<NodeId>,
    ) -> Result<()> {
        let keys = match node {
            NodeRef::Leaf(id) => {
                let leaf = self
                    .leaf_arena
                    .get(id)
                    .ok_or_else(|| corrupted("dangling leaf reference"))?;
                if leaf.keys.len() != leaf.lists.len() {
                    return Err(corrupted("leaf key/list arity mismatch"));
                }
                for list in &leaf.lists {
                    let mut prev: Option<f32> = None;
                    for entry in list {
                        if prev.is_some_and(|p| p < entry.score) {
                            return Err(corrupted("score list not non-increasing"));
                        }
                        prev = Some(entry.score);
                    }
                }
                leaf_depths.push(depth);
                tree_leaves.push(id);
                &leaf.keys
            }
            NodeRef::Branch(id) => {
                let branch = self
                    .branch_arena
                    .get(id)
                    .ok_or_else(|| corrupted("dangling branch reference"))?;
                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(corrupted("branch key/child arity mismatch"));
                }
                for (i, child) in branch.children.iter().enumerate() {
                    if self.parent_of(*child) != id {
                        return Err(corrupted("child parent back-reference mismatch"));
                    }
                    // children[i] covers [keys[i-1], keys[i]).
                    let child_lower = if i == 0 {
                        lower
                    } else {
                        Some(branch.keys[i - 1].as_str())
                    };
                    let child_upper = if i == branch.keys.len() {
                        upper
                    } else {
                        Some(branch.keys[i].as_str())
                    };
                    self.check_node(
                        *child,
                        child_lower,
                        child_upper,
                        depth + 1,
                        leaf_depths,
                        tree_leaves,
                    )?;
                }
                &branch.keys
            }
        };

        for pair in keys.windows(2) {
            if pair[0] >= pair[1] {
                return Err(corrupted("node keys not strictly increasing"));
            }
        }
        for key in keys {
            if lower.is_some_and(|low| key.as_str() < low) {
                return Err(corrupted("key below subtree lower bound"));
            }
            if upper.is_some_and(|high| key.as_str() >= high) {
                return Err(corrupted("key at or above subtree upper bound"));
            }
        }
        Ok(())
    }

    /// The chain must visit exactly the tree's leaves, left to right, with
    /// departments strictly increasing across the whole walk.
    fn check_leaf_chain(&self, tree_leaves: &[NodeId]) -> Result<()> {
        let mut chain_leaves = Vec::new();
        let mut previous_key: Option<&str> = None;
        let mut current = self.first_leaf;
        while let Some(leaf) = self.leaf_arena.get(current) {
            chain_leaves.push(current);
            for key in &leaf.keys {
                if previous_key.is_some_and(|prev| prev >= key.as_str()) {
                    return Err(corrupted("leaf chain keys not strictly increasing"));
                }
                previous_key = Some(key.as_str());
            }
            current = leaf.next;
        }
        if chain_leaves != tree_leaves {
            return Err(corrupted("leaf chain does not match tree leaves"));
        }
        Ok(())
    }
}

fn corrupted(detail: &str) -> IndexError {
    IndexError::CorruptedIndex(detail.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_leaf_trees_are_valid() {
        let mut index = DeptIndex::new();
        index.check_invariants().unwrap();
        index.insert("Math", "UniX", 88.0);
        index.check_invariants().unwrap();
    }

    #[test]
    fn detects_broken_chain() {
        let mut index = DeptIndex::new();
        for dept in ["A", "B", "C", "D", "E"] {
            index.insert(dept, "Uni", 50.0);
        }
        index.check_invariants().unwrap();
        // Sever the chain behind the first leaf.
        let first = index.first_leaf;
        index.leaf_arena.get_mut(first).unwrap().next = NULL_NODE;
        assert!(index.check_invariants().is_err());
    }

    #[test]
    fn detects_unsorted_leaf_keys() {
        let mut index = DeptIndex::new();
        index.insert("A", "Uni", 50.0);
        index.insert("B", "Uni", 50.0);
        let first = index.first_leaf;
        index.leaf_arena.get_mut(first).unwrap().keys.swap(0, 1);
        assert!(index.check_invariants().is_err());
    }
}
