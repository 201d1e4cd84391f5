//! Ragged-batch preprocessing around the dense attention backward kernel.
//!
//! This path sits outside the DAG identity logic: it never creates fingerprinted graph
//! nodes. It repacks variable-length query/key/value batches into dense buffers, drives an
//! opaque backward-attention primitive, and re-splits the dense gradients back into the
//! original ragged shapes. Both the layout work and the kernel math live behind traits so
//! backends supply the actual implementations.

pub mod attention;
pub mod layout;

pub use attention::{
    attention_backward_nested, AttentionBackwardKernel, DenseBackwardInputs, DenseGradients,
    NestedAttentionBackwardArgs, NestedGradients,
};
pub use layout::{CumSeqLengths, LayoutError, NestedLayout, NestedTensor};
