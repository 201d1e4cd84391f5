//! Process-wide dynamic-shape configuration.
//!
//! Dynamic-shape mode controls which fingerprint variant a node adopts as its primary
//! identity at construction time. The mode is the OR of two switches: a presence-only
//! environment toggle probed once per process, and a runtime flag that is re-read on every
//! call. Nodes sample the mode once when they are built; flipping the flag later never
//! rebinds existing nodes.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Presence of this variable enables dynamic-shape mode; its value is ignored.
pub const DYNAMIC_SHAPES_VAR: &str = "TRACEGRAPH_DYNAMIC_SHAPES";

static DYNAMIC_SHAPES_ENV: OnceLock<bool> = OnceLock::new();
static DYNAMIC_SHAPES_FLAG: AtomicBool = AtomicBool::new(false);

fn env_toggle() -> bool {
    *DYNAMIC_SHAPES_ENV.get_or_init(|| env::var_os(DYNAMIC_SHAPES_VAR).is_some())
}

/// Whether dynamic-shape mode is currently active.
///
/// The environment probe is memoized on first call and holds for the remainder of the
/// process; the runtime flag is consulted fresh each time.
pub fn dynamic_shapes_enabled() -> bool {
    env_toggle() || DYNAMIC_SHAPES_FLAG.load(Ordering::Relaxed)
}

/// Sets the runtime half of the dynamic-shape switch.
pub fn set_dynamic_shapes(enabled: bool) {
    DYNAMIC_SHAPES_FLAG.store(enabled, Ordering::Relaxed);
}
