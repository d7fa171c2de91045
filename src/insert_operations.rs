//! Incremental insertion: leaf placement, splits, and parent-key promotion.
//!
//! Promotion climbs the non-owning `parent` links: a split node hands its
//! separator to `insert_into_parent`, which either grows the parent in place
//! or splits it too and recurses. The ascent terminates at the root, whose
//! split mints a brand-new root above it.

use crate::node::LeafInsert;
use crate::types::{BranchNode, DeptIndex, LeafNode, NodeId, NodeRef, NULL_NODE};

impl DeptIndex {
    /// Insert one admission record.
    ///
    /// If `department` already exists, `(university, score)` merges into its
    /// score list with no structural change. Otherwise a new key slot is
    /// created, splitting leaves and branches as needed; all leaves stay at
    /// equal depth and the leaf chain stays in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use deptindex::DeptIndex;
    ///
    /// let mut index = DeptIndex::new();
    /// index.insert("Math", "UniY", 80.0);
    /// index.insert("Math", "UniX", 88.0);
    /// assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniX");
    /// ```
    pub fn insert(&mut self, department: &str, university: &str, score: f32) {
        if self.root.is_none() {
            let root_id = self.alloc_leaf(LeafNode::new());
            self.root = Some(NodeRef::Leaf(root_id));
            self.first_leaf = root_id;
        }
        let leaf_id = self
            .find_leaf(department)
            .expect("non-empty tree resolves every key to a leaf");

        self.counters.entry_allocations += 1;
        let outcome = self
            .leaf_arena
            .get_mut(leaf_id)
            .expect("leaf id minted by this index")
            .insert(department, university, score);

        if let LeafInsert::Split {
            new_leaf,
            separator,
        } = outcome
        {
            self.counters.splits += 1;
            // The right half inherited the old `next`; chain it in behind
            // the old leaf once it has an ID.
            let new_id = self.alloc_leaf(new_leaf);
            if let Some(old_leaf) = self.leaf_arena.get_mut(leaf_id) {
                old_leaf.next = new_id;
            }
            self.insert_into_parent(NodeRef::Leaf(leaf_id), separator, NodeRef::Leaf(new_id));
        }
    }

    /// Promote `separator` (with its new right sibling) into the parent of
    /// `old`, growing the tree by one level when `old` was the root.
    fn insert_into_parent(&mut self, old: NodeRef, separator: String, new: NodeRef) {
        let parent_id = self.parent_of(old);
        if parent_id == NULL_NODE {
            let mut new_root = BranchNode::new();
            new_root.keys.push(separator);
            new_root.children.push(old);
            new_root.children.push(new);
            let root_id = self.alloc_branch(new_root);
            self.set_parent(old, root_id);
            self.set_parent(new, root_id);
            self.root = Some(NodeRef::Branch(root_id));
            return;
        }

        self.set_parent(new, parent_id);
        let split = self
            .branch_arena
            .get_mut(parent_id)
            .expect("parent id minted by this index")
            .insert_child(separator, new);

        if let Some((new_branch, promoted)) = split {
            self.counters.splits += 1;
            let moved = new_branch.children.clone();
            let new_branch_id = self.alloc_branch(new_branch);
            // Ownership of the moved children changed; repoint their
            // back-references before recursing.
            for child in moved {
                self.set_parent(child, new_branch_id);
            }
            self.insert_into_parent(
                NodeRef::Branch(parent_id),
                promoted,
                NodeRef::Branch(new_branch_id),
            );
        }
    }

    // ========================================================================
    // ARENA HELPERS
    // ========================================================================

    pub(crate) fn alloc_leaf(&mut self, leaf: LeafNode) -> NodeId {
        self.counters.leaf_allocations += 1;
        self.leaf_arena.allocate(leaf)
    }

    pub(crate) fn alloc_branch(&mut self, branch: BranchNode) -> NodeId {
        self.counters.branch_allocations += 1;
        self.branch_arena.allocate(branch)
    }

    pub(crate) fn set_parent(&mut self, node: NodeRef, parent: NodeId) {
        match node {
            NodeRef::Leaf(id) => {
                if let Some(leaf) = self.leaf_arena.get_mut(id) {
                    leaf.parent = parent;
                }
            }
            NodeRef::Branch(id) => {
                if let Some(branch) = self.branch_arena.get_mut(id) {
                    branch.parent = parent;
                }
            }
        }
    }

    pub(crate) fn parent_of(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Leaf(id) => self
                .leaf_arena
                .get(id)
                .map(|leaf| leaf.parent)
                .unwrap_or(NULL_NODE),
            NodeRef::Branch(id) => self
                .branch_arena
                .get(id)
                .map(|branch| branch.parent)
                .unwrap_or(NULL_NODE),
        }
    }
}
