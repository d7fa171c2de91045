//! Core types and data structures for the department index.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree index.

use crate::arena::Arena;
use crate::score_list::ScoreList;

// ============================================================================
// CONSTANTS
// ============================================================================

/// B+ tree order: maximum children per branch node.
///
/// A node holds at most `ORDER - 1` keys, and splits eagerly the moment it
/// reaches that count (one key earlier than the classical overflow rule).
pub const ORDER: usize = 4;

/// Maximum keys per node. Reaching this count triggers a split.
pub(crate) const MAX_KEYS: usize = ORDER - 1;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation.
pub type NodeId = u32;

/// Sentinel for "no node": end of the leaf chain, or a root's parent.
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Department-keyed B+ tree index over university admission records.
///
/// Each key is a department name; each leaf slot owns a [`ScoreList`] of
/// university entries ordered by descending placement score. Records can be
/// loaded one at a time ([`insert`](DeptIndex::insert)) or in bulk via an
/// external merge sort ([`bulk_load`](DeptIndex::bulk_load)).
///
/// # Examples
///
/// ```
/// use deptindex::DeptIndex;
///
/// let mut index = DeptIndex::new();
/// index.insert("Math", "UniX", 88.0);
/// index.insert("Math", "UniZ", 92.0);
///
/// let top = index.lookup_by_rank("Math", 1).unwrap();
/// assert_eq!(top.university, "UniZ");
/// ```
#[derive(Debug)]
pub struct DeptIndex {
    /// The root node, or `None` for an empty tree.
    pub(crate) root: Option<NodeRef>,
    /// Head of the leaf chain (leftmost leaf), `NULL_NODE` when empty.
    pub(crate) first_leaf: NodeId,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: Arena<LeafNode>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: Arena<BranchNode>,
    /// Cumulative metrics counters (since construction or last reset).
    pub(crate) counters: crate::metrics::Counters,
}

/// Leaf node: department keys plus the score list owned by each key slot.
#[derive(Debug)]
pub struct LeafNode {
    /// Sorted department names, strictly increasing.
    pub(crate) keys: Vec<String>,
    /// `lists[i]` is owned by the key slot `keys[i]`.
    pub(crate) lists: Vec<ScoreList>,
    /// Next leaf in the chain (ascending key order), `NULL_NODE` at the end.
    pub(crate) next: NodeId,
    /// Non-owning back-reference to the containing branch.
    pub(crate) parent: NodeId,
}

/// Branch (internal) node: separator keys and child references.
#[derive(Debug)]
pub struct BranchNode {
    /// Sorted separator keys; `children.len() == keys.len() + 1`.
    pub(crate) keys: Vec<String>,
    /// Child nodes, exclusively owned through the arenas.
    pub(crate) children: Vec<NodeRef>,
    /// Non-owning back-reference to the containing branch.
    pub(crate) parent: NodeId,
}

/// Reference to a node in one of the two arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Transient (university, department, score) triple used while bulk loading.
///
/// Records exist only between the input reader and the bulk builder; once a
/// record is folded into a leaf's [`ScoreList`] it is never referenced again.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub university: String,
    pub department: String,
    pub score: f32,
}

impl Record {
    pub fn new(
        university: impl Into<String>,
        department: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            university: university.into(),
            department: department.into(),
            score,
        }
    }
}
