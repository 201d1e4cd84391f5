//! Edge references: (node, output index) pairs used to wire node inputs.
//!
//! Two forms exist over the same node identity: [`Output`] borrows a node owned elsewhere
//! (typically by the trace session), while [`Value`] shares ownership through a [`NodePtr`]
//! and keeps the node alive on its own.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use crate::hashing::{self, Fingerprint};

use super::node::{Node, NodePtr};

/// Borrowed reference to one output slot of a node.
///
/// Container semantics (`PartialEq<Output>`, `std::hash::Hash`) are identity-based — the
/// referenced node's address plus the index — so hash sets deduplicate edges of one graph
/// without consulting content fingerprints.
#[derive(Clone, Copy, Debug)]
pub struct Output<'a> {
    node: &'a Node,
    index: usize,
}

impl<'a> Output<'a> {
    pub fn new(node: &'a Node, index: usize) -> Self {
        Output { node, index }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Content fingerprint of the edge: the node's primary hash mixed with the index.
    pub fn hash(&self) -> Fingerprint {
        hashing::combine(self.node.hash(), hashing::fingerprint_usize(self.index))
    }
}

impl PartialEq for Output<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.node, other.node) && self.index == other.index
    }
}

impl Eq for Output<'_> {}

impl Hash for Output<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.node as *const Node).hash(state);
        self.index.hash(state);
    }
}

/// Cross-type edge equality compares the referenced nodes' *content hashes*, not their
/// identities: two structurally identical but distinct nodes produce equal edges. This is
/// a stated contract of the system — callers that need identity equality must compare
/// `Output` against `Output`.
impl PartialEq<Value> for Output<'_> {
    fn eq(&self, rhs: &Value) -> bool {
        self.node.hash() == rhs.node().hash() && self.index == rhs.index()
    }
}

impl fmt::Display for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, index={}", self.node, self.index)
    }
}

/// Shared-ownership reference to one output slot of a node.
#[derive(Clone, Debug)]
pub struct Value {
    node: NodePtr,
    index: usize,
}

impl Value {
    pub fn new(node: NodePtr, index: usize) -> Self {
        Value { node, index }
    }

    /// Wraps output slot 0, the common single-output case.
    pub fn from_node(node: NodePtr) -> Self {
        Value::new(node, 0)
    }

    pub fn node(&self) -> &NodePtr {
        &self.node
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Content fingerprint of the edge under the node's primary hash.
    pub fn hash(&self) -> Fingerprint {
        hashing::combine(self.node.hash(), hashing::fingerprint_usize(self.index))
    }

    /// Edge fingerprint under the node's size-sensitive hash.
    pub fn hash_with_sizes(&self) -> Fingerprint {
        hashing::combine(
            self.node.hash_with_sizes(),
            hashing::fingerprint_usize(self.index),
        )
    }

    /// Edge fingerprint under the node's size-blind hash.
    pub fn hash_without_sizes(&self) -> Fingerprint {
        hashing::combine(
            self.node.hash_without_sizes(),
            hashing::fingerprint_usize(self.index),
        )
    }
}

/// Mirror of the hash-based cross-type equality; see [`Output`]'s impl for the contract.
impl PartialEq<Output<'_>> for Value {
    fn eq(&self, rhs: &Output<'_>) -> bool {
        rhs == self
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, index={}", self.node, self.index)
    }
}
