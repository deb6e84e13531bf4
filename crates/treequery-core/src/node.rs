//! Generic arena-backed tree.
//!
//! Nodes live in a single `Vec` and refer to each other by index, so the
//! parent link is a plain non-owning [`NodeId`] rather than a shared pointer.
//! The arena owns every node; dropping the [`Tree`] drops the whole structure.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Index of a node within its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId from a raw index.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single vertex: payload, non-owning parent link, children in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<T> {
    data: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    fn new(data: T, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            children: Vec::new(),
        }
    }

    /// The payload stored in this node.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The parent link, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A node with no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of [`Node`]s rooted at the node created by [`Tree::new`].
///
/// Nodes are created and attached exactly once; nothing is ever removed or
/// reparented, so a `NodeId` handed out by this tree stays valid for its
/// whole lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    /// Create a tree whose arena contains a single root node with no parent.
    pub fn new(root_data: T) -> Self {
        Self {
            nodes: vec![Node::new(root_data, None)],
        }
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena (always at least 1).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the arena holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node by id.
    pub fn get(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    /// Create a detached node holding `data` with the given parent link.
    ///
    /// The new node is *not* registered in the parent's child list; callers
    /// that want a consistent tree must go through [`Tree::add_child`] or
    /// [`Tree::push_child`] instead of pairing this with [`Tree::set_parent`].
    pub fn new_node(&mut self, data: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data, parent));
        id
    }

    /// Append `child` to `parent`'s children and point `child`'s parent link
    /// back at `parent`, overwriting any previous link.
    ///
    /// Adding the same id twice creates two entries; callers must not
    /// double-add.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Create a node holding `data` and attach it under `parent` in one step.
    pub fn push_child(&mut self, parent: NodeId, data: T) -> NodeId {
        let child = self.new_node(data, Some(parent));
        self.nodes[parent.0].children.push(child);
        child
    }

    /// Borrow the payload of `id`.
    pub fn data(&self, id: NodeId) -> &T {
        &self.nodes[id.0].data
    }

    /// Mutably borrow the payload of `id`.
    pub fn data_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].data
    }

    /// Replace the payload of `id`.
    pub fn set_data(&mut self, id: NodeId, data: T) {
        self.nodes[id.0].data = data;
    }

    /// Parent link of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Overwrite the parent link of `id`.
    ///
    /// Touches only the single field: neither the old nor the new parent's
    /// child list is updated. [`Tree::add_child`] does that bookkeeping;
    /// calling this directly leaves the tree inconsistent.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }

    /// Iterate the children of `id` in insertion order.
    ///
    /// Each call yields a fresh iterator over the stored order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    /// Iterate the children of `id` ordered by `cmp` over their payloads.
    ///
    /// Sorts a copy of the child id list; the stored insertion order is never
    /// mutated. Relative order of payloads that compare equal is unspecified.
    pub fn children_sorted_by<F>(&self, id: NodeId, mut cmp: F) -> impl Iterator<Item = NodeId>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut ids = self.nodes[id.0].children.clone();
        ids.sort_by(|a, b| cmp(&self.nodes[a.0].data, &self.nodes[b.0].data));
        ids.into_iter()
    }

    /// Whether `id` has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }
}
