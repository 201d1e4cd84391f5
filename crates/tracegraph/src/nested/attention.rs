//! Backward-attention preprocessing for ragged batches.
//!
//! The flow mirrors the dense kernel's expectations: pack the five ragged operands, run the
//! opaque backward primitive once, then re-split the three dense gradients against the
//! original query/key/value shapes. An undefined upstream gradient is a defined no-op, not
//! an error: the whole pipeline short-circuits before any packing or kernel work happens.

use anyhow::{ensure, Result};

use super::layout::{CumSeqLengths, NestedLayout, NestedTensor};

/// Opaque dense backward-attention primitive supplied by a backend.
///
/// Failures inside the kernel propagate to the caller unchanged; this crate neither wraps
/// nor retries them.
pub trait AttentionBackwardKernel {
    type Buffer;

    fn backward(
        &self,
        inputs: DenseBackwardInputs<'_, Self::Buffer>,
    ) -> Result<DenseGradients<Self::Buffer>>;
}

/// Packed operands handed to the dense backward kernel.
pub struct DenseBackwardInputs<'a, B> {
    pub grad_out: &'a B,
    pub query: &'a B,
    pub key: &'a B,
    pub value: &'a B,
    pub out: &'a B,
    /// Log-sum-exp normalizer saved by the forward pass, passed through verbatim.
    pub logsumexp: &'a B,
    pub cum_seq_q: &'a CumSeqLengths,
    pub cum_seq_k: &'a CumSeqLengths,
    pub max_seqlen_q: usize,
    pub max_seqlen_k: usize,
}

/// Dense gradients produced by the kernel, still in packed layout.
pub struct DenseGradients<B> {
    pub grad_query: B,
    pub grad_key: B,
    pub grad_value: B,
}

/// Ragged inputs for the backward preprocessing entry point.
pub struct NestedAttentionBackwardArgs<'a, B> {
    /// Upstream gradient; `None` means the output gradient is undefined and the whole
    /// backward pass is skipped.
    pub grad_out: Option<&'a NestedTensor<B>>,
    pub query: &'a NestedTensor<B>,
    pub key: &'a NestedTensor<B>,
    pub value: &'a NestedTensor<B>,
    pub out: &'a NestedTensor<B>,
    pub logsumexp: &'a B,
    pub cum_seq_q: &'a CumSeqLengths,
    pub cum_seq_k: &'a CumSeqLengths,
    pub max_seqlen_q: usize,
    pub max_seqlen_k: usize,
}

/// Gradients matching the original ragged query/key/value shapes. All three are `None`
/// when the upstream gradient was undefined.
#[derive(Debug)]
pub struct NestedGradients<B> {
    pub grad_query: Option<NestedTensor<B>>,
    pub grad_key: Option<NestedTensor<B>>,
    pub grad_value: Option<NestedTensor<B>>,
}

impl<B> NestedGradients<B> {
    /// The no-op result for an undefined upstream gradient.
    pub fn undefined() -> Self {
        NestedGradients {
            grad_query: None,
            grad_key: None,
            grad_value: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.grad_query.is_some() && self.grad_key.is_some() && self.grad_value.is_some()
    }
}

/// Runs the backward-attention path over a ragged batch.
///
/// Packs grad_out/query/key/value/out through the layout service, invokes the dense kernel
/// once, and unpacks the three gradients against the original input shapes. Returns
/// [`NestedGradients::undefined`] without touching either service when `grad_out` is
/// `None`.
pub fn attention_backward_nested<L, K>(
    layout: &L,
    kernel: &K,
    args: NestedAttentionBackwardArgs<'_, L::Buffer>,
) -> Result<NestedGradients<L::Buffer>>
where
    L: NestedLayout,
    K: AttentionBackwardKernel<Buffer = L::Buffer>,
{
    let Some(grad_out) = args.grad_out else {
        return Ok(NestedGradients::undefined());
    };

    validate_ragged_inputs(&args, grad_out)?;

    let grad_out_buffer = layout.pack(grad_out, args.cum_seq_q)?;
    let query_buffer = layout.pack(args.query, args.cum_seq_q)?;
    let key_buffer = layout.pack(args.key, args.cum_seq_k)?;
    let value_buffer = layout.pack(args.value, args.cum_seq_k)?;
    let out_buffer = layout.pack(args.out, args.cum_seq_q)?;

    let dense = kernel.backward(DenseBackwardInputs {
        grad_out: &grad_out_buffer,
        query: &query_buffer,
        key: &key_buffer,
        value: &value_buffer,
        out: &out_buffer,
        logsumexp: args.logsumexp,
        cum_seq_q: args.cum_seq_q,
        cum_seq_k: args.cum_seq_k,
        max_seqlen_q: args.max_seqlen_q,
        max_seqlen_k: args.max_seqlen_k,
    })?;

    let grad_query = layout.unpack(dense.grad_query, args.query.sizes(), args.cum_seq_q)?;
    let grad_key = layout.unpack(dense.grad_key, args.key.sizes(), args.cum_seq_k)?;
    let grad_value = layout.unpack(dense.grad_value, args.value.sizes(), args.cum_seq_k)?;

    Ok(NestedGradients {
        grad_query: Some(grad_query),
        grad_key: Some(grad_key),
        grad_value: Some(grad_value),
    })
}

fn validate_ragged_inputs<B>(
    args: &NestedAttentionBackwardArgs<'_, B>,
    grad_out: &NestedTensor<B>,
) -> Result<()> {
    let batch = args.query.batch_size();
    ensure!(
        args.key.batch_size() == batch && args.value.batch_size() == batch,
        "query/key/value batch sizes disagree: {} vs {} vs {}",
        batch,
        args.key.batch_size(),
        args.value.batch_size()
    );
    ensure!(
        grad_out.batch_size() == batch,
        "grad_out batch size {} does not match query batch size {}",
        grad_out.batch_size(),
        batch
    );
    ensure!(
        args.out.batch_size() == batch,
        "forward output batch size {} does not match query batch size {}",
        args.out.batch_size(),
        batch
    );
    ensure!(
        args.cum_seq_q.batch_size() == batch,
        "query offsets describe {} sequences, expected {}",
        args.cum_seq_q.batch_size(),
        batch
    );
    ensure!(
        args.cum_seq_k.batch_size() == batch,
        "key/value offsets describe {} sequences, expected {}",
        args.cum_seq_k.batch_size(),
        batch
    );
    ensure!(
        args.max_seqlen_q >= args.cum_seq_q.max_len(),
        "max_seqlen_q {} is smaller than the longest query sequence {}",
        args.max_seqlen_q,
        args.cum_seq_q.max_len()
    );
    ensure!(
        args.max_seqlen_k >= args.cum_seq_k.max_len(),
        "max_seqlen_k {} is smaller than the longest key sequence {}",
        args.max_seqlen_k,
        args.cum_seq_k.max_len()
    );
    Ok(())
}
