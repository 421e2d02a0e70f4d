//! Node storage of the trie: page-sized blocks of nodes, addressed by handles, and a free list of
//! released handles.

use std::ops::{Index, IndexMut};

/// Handle to a node inside an [`Arena`].
pub(crate) type NodeId = usize;

/// Handle of the root node. The root is acquired first and never released.
pub(crate) const ROOT: NodeId = 0;

/// Target footprint of a single block of nodes.
pub(crate) const PAGE_SIZE: usize = 4096;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            left: None,
            right: None,
            parent: None,
        }
    }
}

impl<T> Node<T> {
    #[inline(always)]
    pub(crate) fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// The node neither stores a value nor branches to any child.
    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.value.is_none() && !self.has_children()
    }
}

/// Number of nodes in each block, such that a block fills one page.
fn nodes_per_block<T>() -> usize {
    (PAGE_SIZE / std::mem::size_of::<Node<T>>().max(1)).max(1)
}

/// Pool of trie nodes.
///
/// Fresh nodes are carved from the last block; once it is full, a new block is pushed. Blocks
/// are never shrunk or moved, so the memory footprint follows the peak number of nodes. Released
/// nodes are kept on an explicit free list and handed out again before carving new slots.
pub(crate) struct Arena<T> {
    blocks: Vec<Vec<Node<T>>>,
    free: Vec<NodeId>,
    block_len: usize,
}

impl<T: Clone> Clone for Arena<T> {
    fn clone(&self) -> Self {
        // every block of the copy must hold a full page as well
        let blocks = self
            .blocks
            .iter()
            .map(|block| {
                let mut copy = Vec::with_capacity(self.block_len);
                copy.extend_from_slice(block);
                copy
            })
            .collect();
        Self {
            blocks,
            free: self.free.clone(),
            block_len: self.block_len,
        }
    }
}

impl<T> Arena<T> {
    /// Create an empty arena. No block is allocated before the first call to `acquire`.
    pub(crate) fn new() -> Self {
        Self {
            blocks: Vec::new(),
            free: Vec::new(),
            block_len: nodes_per_block::<T>(),
        }
    }

    /// Get an empty node, either from the free list or from the pool.
    pub(crate) fn acquire(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self[id].is_empty() && self[id].parent.is_none());
            return id;
        }
        let full = self
            .blocks
            .last()
            .map_or(true, |block| block.len() == self.block_len);
        if full {
            tracing::trace!(
                block = self.blocks.len(),
                nodes = self.block_len,
                "allocate node block"
            );
            self.blocks.push(Vec::with_capacity(self.block_len));
        }
        let block_idx = self.blocks.len() - 1;
        let block = &mut self.blocks[block_idx];
        let id = block_idx * self.block_len + block.len();
        block.push(Node::default());
        id
    }

    /// Put a node back on the free list, clearing all its fields, and return the value it held.
    /// The node must already be detached from the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<T> {
        debug_assert_ne!(id, ROOT);
        let node = std::mem::take(&mut self[id]);
        self.free.push(id);
        node.value
    }

    /// Number of slots carved from the blocks so far, including released ones.
    pub(crate) fn capacity(&self) -> usize {
        match self.blocks.last() {
            Some(last) => (self.blocks.len() - 1) * self.block_len + last.len(),
            None => 0,
        }
    }

    /// Number of nodes that are currently handed out.
    pub(crate) fn live(&self) -> usize {
        self.capacity() - self.free.len()
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    pub(crate) fn child(&self, id: NodeId, right: bool) -> Option<NodeId> {
        if right {
            self[id].right
        } else {
            self[id].left
        }
    }

    /// Link `child` below `parent`, on the right or on the left.
    #[inline(always)]
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, right: bool) {
        debug_assert!(self.child(parent, right).is_none());
        if right {
            self[parent].right = Some(child);
        } else {
            self[parent].left = Some(child);
        }
        self[child].parent = Some(parent);
    }

    /// Unlink a node from its parent, and return the parent. Its own children stay attached.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent.take()?;
        let node = &mut self[parent];
        if node.right == Some(id) {
            node.right = None;
        } else {
            debug_assert_eq!(node.left, Some(id));
            node.left = None;
        }
        Some(parent)
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.blocks[id / self.block_len][id % self.block_len]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    #[inline(always)]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.blocks[id / self.block_len][id % self.block_len]
    }
}
