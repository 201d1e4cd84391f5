//! Lazy computation-graph tracing core.
//!
//! The crate records deferred tensor operations as nodes in a DAG, assigns every node a
//! structural fingerprint usable for deduplication and plan caching, and keeps an ordered
//! per-thread trace of all nodes created since the last flush so a finished tracing session
//! can be handed to a compiler or executor as one unit.
//!
//! Two fingerprint variants are maintained per node: one that folds tensor sizes into the
//! digest and one that ignores them. The shape-blind variant lets downstream caches reuse a
//! compiled graph across inputs that differ only in their dimensions when dynamic-shape mode
//! is active.

pub mod env;
pub mod hashing;
pub mod ir;
pub mod nested;
pub mod profiling;
pub mod shape;

pub use ir::{Node, NodePtr, OpKind, Output, Value};
pub use shape::Shape;
