use tracegraph::hashing::{self, Fingerprint};
use tracegraph::{Node, OpKind, Shape};

fn shape_aware_hash(op: OpKind, shape: Shape) -> impl Fn(bool) -> Fingerprint {
    move |include_sizes| {
        let base = op.fingerprint();
        if include_sizes {
            let dims = hashing::fingerprint_serializable(&shape).expect("shape serializes");
            hashing::combine(base, dims)
        } else {
            base
        }
    }
}

#[test]
fn derived_hash_binds_size_sensitive_variant_by_default() {
    // Neither the env toggle nor the runtime flag is set in this test binary, so caches
    // should require identical shapes to match.
    let op = OpKind::get("graph::add");
    let node = Node::new(op, 1, shape_aware_hash(op, Shape::new([2, 2])));

    assert_eq!(node.hash(), node.hash_with_sizes());
    assert_ne!(node.hash(), node.hash_without_sizes());
}

#[test]
fn identical_inputs_produce_identical_fingerprints() {
    let op = OpKind::get("graph::mul");
    let shape = Shape::new([4, 8]);
    let first = Node::new(op, 1, shape_aware_hash(op, shape.clone()));
    let second = Node::new(op, 1, shape_aware_hash(op, shape));

    assert_eq!(first.hash(), second.hash());
    assert_eq!(first.hash_with_sizes(), second.hash_with_sizes());
    assert_eq!(first.hash_without_sizes(), second.hash_without_sizes());
}

#[test]
fn shape_sensitive_callback_separates_the_two_variants() {
    let op = OpKind::get("graph::reshape");
    let node = Node::new(op, 1, shape_aware_hash(op, Shape::new([16])));
    assert_ne!(node.hash_with_sizes(), node.hash_without_sizes());

    let invariant_op = OpKind::get("graph::barrier");
    let invariant = Node::new(invariant_op, 1, |_include_sizes| {
        invariant_op.fingerprint()
    });
    assert_eq!(
        invariant.hash_with_sizes(),
        invariant.hash_without_sizes(),
        "a shape-invariant callback must collapse both variants"
    );
}

#[test]
fn explicit_node_hash_is_taken_verbatim() {
    let op = OpKind::get("graph::custom");
    let supplied: Fingerprint = 0x00c0_ffee_d00d_f00d;
    let node = Node::with_node_hash(op, 2, supplied, shape_aware_hash(op, Shape::new([3, 3])));

    assert_eq!(node.hash(), supplied);
    // Both retained variants still come from the callback, independent of the supplied hash.
    assert_ne!(node.hash_with_sizes(), supplied);
    assert_ne!(node.hash_without_sizes(), supplied);
    assert_eq!(node.num_outputs(), 2);
}

#[test]
fn op_kinds_intern_by_qualified_name() {
    let first = OpKind::get("frontend::fused_rope");
    let second = OpKind::get("frontend::fused_rope");
    let other = OpKind::get("frontend::fused_rms_norm");

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_ne!(first, other);
    assert_ne!(first.fingerprint(), other.fingerprint());
    assert_eq!(first.name(), "frontend::fused_rope");
    assert_eq!(format!("{first}"), "frontend::fused_rope");
}

#[test]
fn display_mentions_output_count_only_when_plural() {
    let single = Node::new(OpKind::get("graph::exp"), 1, |_| 1);
    assert_eq!(format!("{single}"), "graph::exp");

    let multi = Node::new(OpKind::get("graph::split"), 3, |_| 2);
    assert_eq!(format!("{multi}"), "graph::split, num_outputs=3");
}
