//! Optional debug metadata attached to nodes at construction.
//!
//! Capture is an injectable capability: install a [`MetadataProvider`] and every node built
//! while the guard lives carries whatever scope and frame information the provider returns.
//! With no provider installed, capture returns the default value and costs nothing. The
//! metadata is a pure side channel; it never participates in fingerprints or equality.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// Scope string plus source-frame information recorded for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub scope: String,
    pub frame: Option<FrameInfo>,
}

/// One source-frame entry pointing at the user code that created a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub function: String,
    pub file: String,
    pub line: u32,
}

/// Collaborator that captures scope/frame information for every constructed node.
pub trait MetadataProvider: Send + Sync {
    fn capture(&self) -> NodeMetadata;
}

static PROVIDER: Lazy<RwLock<Option<Arc<dyn MetadataProvider>>>> =
    Lazy::new(|| RwLock::new(None));

/// RAII guard that uninstalls the metadata provider when dropped.
pub struct ProviderGuard {
    active: bool,
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        if self.active {
            let mut slot = PROVIDER.write().expect("metadata provider slot poisoned");
            *slot = None;
            self.active = false;
        }
    }
}

/// Installs `provider` process-wide, replacing any previous one, and returns a guard that
/// restores the empty state on drop.
pub fn install_provider(provider: Arc<dyn MetadataProvider>) -> ProviderGuard {
    let mut slot = PROVIDER.write().expect("metadata provider slot poisoned");
    *slot = Some(provider);
    ProviderGuard { active: true }
}

pub(crate) fn capture() -> NodeMetadata {
    let slot = PROVIDER.read().expect("metadata provider slot poisoned");
    match slot.as_ref() {
        Some(provider) => provider.capture(),
        None => NodeMetadata::default(),
    }
}
