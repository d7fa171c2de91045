//! Node-level operations for leaf and branch nodes.
//!
//! Splitting is eager: a node splits the
//! moment its key count reaches `ORDER - 1`, one key earlier than the
//! classical overflow-past-capacity rule. Split points are `(ORDER - 1) / 2`
//! for both node kinds; leaves copy the separator up, branches promote it.

use crate::score_list::ScoreList;
use crate::types::{BranchNode, LeafNode, NodeRef, MAX_KEYS, NULL_NODE};

// ============================================================================
// LEAF NODE
// ============================================================================

/// Outcome of inserting one record into a leaf.
pub(crate) enum LeafInsert {
    /// Merged into an existing department's list, or inserted with room to
    /// spare. No structural change.
    Done,
    /// The leaf reached `ORDER - 1` keys and must split; the detached right
    /// half still needs arena allocation and chain linking.
    Split {
        new_leaf: LeafNode,
        separator: String,
    },
}

impl LeafNode {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::with_capacity(MAX_KEYS),
            lists: Vec::with_capacity(MAX_KEYS),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }

    /// Number of department keys in this leaf.
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Position of `department` in this leaf, if present.
    pub(crate) fn slot_of(&self, department: &str) -> Option<usize> {
        self.keys.binary_search_by(|k| k.as_str().cmp(department)).ok()
    }

    /// Borrow the score list owned by `department`'s slot.
    pub(crate) fn list_for(&self, department: &str) -> Option<&ScoreList> {
        self.slot_of(department).map(|i| &self.lists[i])
    }

    /// Insert a record, merging into an existing department slot or creating
    /// a new one. Returns `Split` when the new key pushes the leaf to the
    /// eager-split threshold.
    pub(crate) fn insert(&mut self, department: &str, university: &str, score: f32) -> LeafInsert {
        match self.keys.binary_search_by(|k| k.as_str().cmp(department)) {
            Ok(slot) => {
                self.lists[slot].insert(university, score);
                LeafInsert::Done
            }
            Err(slot) => {
                let mut list = ScoreList::new();
                list.insert(university, score);
                self.keys.insert(slot, department.to_owned());
                self.lists.insert(slot, list);

                if self.keys.len() == MAX_KEYS {
                    let (new_leaf, separator) = self.split();
                    LeafInsert::Split {
                        new_leaf,
                        separator,
                    }
                } else {
                    LeafInsert::Done
                }
            }
        }
    }

    /// Append a pre-built (department, list) pair; bulk path only, where the
    /// stream arrives in ascending department order.
    pub(crate) fn push_slot(&mut self, department: String, list: ScoreList) {
        debug_assert!(self.keys.last().map_or(true, |k| *k < department));
        self.keys.push(department);
        self.lists.push(list);
    }

    /// Detach the upper half into a new right leaf.
    ///
    /// The caller allocates the returned leaf, links it after `self` in the
    /// chain, and promotes the returned separator (the right leaf's first
    /// key). `next` is inherited by the right half; `self.next` must be
    /// rewired to the new leaf's ID once allocated.
    fn split(&mut self) -> (LeafNode, String) {
        let split_point = MAX_KEYS / 2;
        let right_keys = self.keys.split_off(split_point);
        let right_lists = self.lists.split_off(split_point);
        let separator = right_keys[0].clone();

        let new_leaf = LeafNode {
            keys: right_keys,
            lists: right_lists,
            next: self.next,
            parent: self.parent,
        };
        self.next = NULL_NODE;
        (new_leaf, separator)
    }
}

// ============================================================================
// BRANCH NODE
// ============================================================================

impl BranchNode {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::with_capacity(MAX_KEYS),
            children: Vec::with_capacity(MAX_KEYS + 1),
            parent: NULL_NODE,
        }
    }

    /// Index of the child whose subtree covers `department`.
    ///
    /// Equal keys route right: the child index is the count of separator
    /// keys `<= department`.
    pub(crate) fn find_child_index(&self, department: &str) -> usize {
        match self.keys.binary_search_by(|k| k.as_str().cmp(department)) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Child reference covering `department`.
    pub(crate) fn child_for(&self, department: &str) -> NodeRef {
        self.children[self.find_child_index(department)]
    }

    /// Insert a promoted separator and its new right child.
    ///
    /// Returns the detached right half and the key to promote further when
    /// the insertion pushes this branch to the eager-split threshold.
    pub(crate) fn insert_child(
        &mut self,
        separator: String,
        new_child: NodeRef,
    ) -> Option<(BranchNode, String)> {
        let position = self
            .keys
            .binary_search_by(|k| k.as_str().cmp(separator.as_str()))
            .unwrap_or_else(|i| i);
        self.keys.insert(position, separator);
        self.children.insert(position + 1, new_child);

        if self.keys.len() == MAX_KEYS {
            Some(self.split())
        } else {
            None
        }
    }

    /// Detach the upper half into a new right branch, promoting the middle
    /// key. The caller reassigns `parent` links of the moved children.
    fn split(&mut self) -> (BranchNode, String) {
        let split_point = MAX_KEYS / 2;
        let promoted = self.keys[split_point].clone();

        let right_keys = self.keys.split_off(split_point + 1);
        let right_children = self.children.split_off(split_point + 1);
        self.keys.pop(); // the promoted key leaves both halves

        let new_branch = BranchNode {
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };
        (new_branch, promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_splits_at_eager_threshold() {
        let mut leaf = LeafNode::new();
        assert!(matches!(leaf.insert("B", "U1", 50.0), LeafInsert::Done));
        assert!(matches!(leaf.insert("A", "U2", 60.0), LeafInsert::Done));
        match leaf.insert("C", "U3", 70.0) {
            LeafInsert::Split {
                new_leaf,
                separator,
            } => {
                // Split point (ORDER-1)/2 = 1: left keeps one key.
                assert_eq!(leaf.keys, vec!["A"]);
                assert_eq!(new_leaf.keys, vec!["B", "C"]);
                assert_eq!(separator, "B");
            }
            LeafInsert::Done => panic!("third distinct key must split"),
        }
    }

    #[test]
    fn duplicate_department_merges_without_split() {
        let mut leaf = LeafNode::new();
        leaf.insert("A", "U1", 50.0);
        leaf.insert("B", "U2", 60.0);
        // A third record for an existing key grows the list, not the keys.
        assert!(matches!(leaf.insert("A", "U3", 70.0), LeafInsert::Done));
        assert_eq!(leaf.len(), 2);
        assert_eq!(leaf.list_for("A").unwrap().len(), 2);
    }

    #[test]
    fn child_index_routes_equal_keys_right() {
        let mut branch = BranchNode::new();
        branch.keys = vec!["Biology".into(), "Physics".into()];
        branch.children = vec![NodeRef::Leaf(0), NodeRef::Leaf(1), NodeRef::Leaf(2)];
        assert_eq!(branch.find_child_index("Art"), 0);
        assert_eq!(branch.find_child_index("Biology"), 1);
        assert_eq!(branch.find_child_index("Math"), 1);
        assert_eq!(branch.find_child_index("Physics"), 2);
        assert_eq!(branch.find_child_index("Zoology"), 2);
    }

    #[test]
    fn branch_split_promotes_middle_key() {
        let mut branch = BranchNode::new();
        branch.keys = vec!["B".into(), "D".into()];
        branch.children = vec![NodeRef::Leaf(0), NodeRef::Leaf(1), NodeRef::Leaf(2)];
        let (right, promoted) = branch.insert_child("C".into(), NodeRef::Leaf(3)).unwrap();
        assert_eq!(promoted, "C");
        assert_eq!(branch.keys, vec!["B"]);
        assert_eq!(branch.children, vec![NodeRef::Leaf(0), NodeRef::Leaf(1)]);
        assert_eq!(right.keys, vec!["D"]);
        assert_eq!(right.children, vec![NodeRef::Leaf(3), NodeRef::Leaf(2)]);
    }
}
