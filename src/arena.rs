//! Append-only arena for node storage.
//!
//! Nodes are addressed by [`NodeId`] instead of owning pointers, which lets
//! `parent` and `next` back-references exist without a second owner. The
//! index never deletes individual nodes, so there is no free list; the whole
//! arena is released in one piece when the tree is cleared or dropped.

use std::convert::TryFrom;

use crate::types::{NodeId, NULL_NODE};

/// Append-only arena allocator addressed by `NodeId`.
#[derive(Debug)]
pub struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Arena<T> {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    /// Allocate a new item and return its ID.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = self.storage.len();
        self.storage.push(item);
        NodeId::try_from(index).expect("arena index exceeds NodeId range")
    }

    /// Get a reference to the item with the given ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get(id as usize)
    }

    /// Get a mutable reference to the item with the given ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get_mut(id as usize)
    }

    /// Release every item at once.
    pub fn clear(&mut self) {
        self.storage.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
