//! Environment half of the dynamic-shape switch.
//!
//! Lives in its own test binary: the environment probe is memoized once per process, so
//! the variable has to be set before anything queries the mode.

use tracegraph::env;
use tracegraph::hashing::{self, Fingerprint};
use tracegraph::{Node, OpKind};

fn shape_aware_hash(op: OpKind) -> impl Fn(bool) -> Fingerprint {
    move |include_sizes| {
        let base = op.fingerprint();
        if include_sizes {
            hashing::combine(base, hashing::fingerprint_usize(256))
        } else {
            base
        }
    }
}

#[test]
fn env_toggle_enables_dynamic_shapes_for_the_process_lifetime() {
    // Presence-only: the value is ignored, so even "0" switches the mode on.
    std::env::set_var(env::DYNAMIC_SHAPES_VAR, "0");

    assert!(
        env::dynamic_shapes_enabled(),
        "presence of {} must enable dynamic shapes while the runtime flag stays false",
        env::DYNAMIC_SHAPES_VAR
    );

    let op = OpKind::get("graph::add");
    let node = Node::new(op, 1, shape_aware_hash(op));
    assert_eq!(
        node.hash(),
        node.hash_without_sizes(),
        "dynamic-shape mode must bind the size-blind variant"
    );

    // The probe happened above; removing the variable no longer changes anything.
    std::env::remove_var(env::DYNAMIC_SHAPES_VAR);
    assert!(
        env::dynamic_shapes_enabled(),
        "the environment probe is memoized for the remainder of the process"
    );
}
