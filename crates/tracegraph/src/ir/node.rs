//! The DAG vertex: operator identity, output arity, and cached fingerprints.

use std::fmt;
use std::sync::Arc;

use crate::env;
use crate::hashing::Fingerprint;

use super::metadata::{self, NodeMetadata};
use super::op::OpKind;
use super::trace;

/// Shared-ownership handle to a node. The trace session holds one of these per node, so a
/// node stays alive at least until the second flush after its creation.
pub type NodePtr = Arc<Node>;

/// One traced operation in the DAG.
///
/// All identity fields are immutable after construction. `hash()` aliases whichever of the
/// two retained dag-hash variants matched the dynamic-shape setting when the node was built;
/// that binding is fixed at birth and never re-evaluated, even if the setting changes later.
#[derive(Debug)]
pub struct Node {
    op: OpKind,
    num_outputs: usize,
    hash: Fingerprint,
    hash_without_sizes: Fingerprint,
    hash_with_sizes: Fingerprint,
    metadata: NodeMetadata,
    trace_index: usize,
}

impl Node {
    /// Builds a node whose primary hash is derived from `dag_hash_fn`.
    ///
    /// The callback receives `include_sizes` and must fold tensor dimensions into the
    /// digest only when it is true. With dynamic shapes off the node adopts the
    /// size-sensitive digest (caches require identical shapes to match); with dynamic
    /// shapes on it adopts the size-blind digest so structurally identical graphs can be
    /// reused across shapes. The setting is read once per construction: two nodes built
    /// from identical inputs can end up with different primary hashes if it changes in
    /// between, and that is accepted.
    pub fn new<F>(op: OpKind, num_outputs: usize, dag_hash_fn: F) -> NodePtr
    where
        F: Fn(bool) -> Fingerprint,
    {
        let node_hash = dag_hash_fn(!env::dynamic_shapes_enabled());
        Self::with_node_hash(op, num_outputs, node_hash, dag_hash_fn)
    }

    /// Builds a node with a caller-supplied primary hash.
    ///
    /// Both dag-hash variants are still computed from `dag_hash_fn` so either view can be
    /// requested later, independently of what `node_hash` was derived from.
    pub fn with_node_hash<F>(
        op: OpKind,
        num_outputs: usize,
        node_hash: Fingerprint,
        dag_hash_fn: F,
    ) -> NodePtr
    where
        F: Fn(bool) -> Fingerprint,
    {
        let node = Node {
            op,
            num_outputs,
            hash: node_hash,
            hash_without_sizes: dag_hash_fn(false),
            hash_with_sizes: dag_hash_fn(true),
            metadata: metadata::capture(),
            trace_index: trace::next_index(),
        };
        trace::push(node)
    }

    pub fn op(&self) -> OpKind {
        self.op
    }

    /// Number of result edges this node produces.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Primary identity fingerprint used for deduplication and cache keys.
    pub fn hash(&self) -> Fingerprint {
        self.hash
    }

    /// Size-blind fingerprint variant.
    pub fn hash_without_sizes(&self) -> Fingerprint {
        self.hash_without_sizes
    }

    /// Size-sensitive fingerprint variant.
    pub fn hash_with_sizes(&self) -> Fingerprint {
        self.hash_with_sizes
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Position this node occupies in the trace session it was created under.
    pub fn trace_index(&self) -> usize {
        self.trace_index
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if self.num_outputs > 1 {
            write!(f, ", num_outputs={}", self.num_outputs)?;
        }
        if !self.metadata.scope.is_empty() {
            write!(f, ", scope={}", self.metadata.scope)?;
        }
        if let Some(frame) = &self.metadata.frame {
            write!(f, ", location={}:{}", frame.file, frame.line)?;
        }
        Ok(())
    }
}
