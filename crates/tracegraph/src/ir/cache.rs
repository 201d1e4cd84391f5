//! Global node reuse cache keyed by primary fingerprint.
//!
//! Workloads that retrace the same program repeatedly (autoregressive decoding, training
//! steps) rebuild structurally identical nodes every session. Keying on the primary hash
//! lets frontends reuse the previous session's node instead of allocating a new one, which
//! also keeps downstream plan caches hitting the same keys.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use once_cell::sync::Lazy;

use crate::hashing::Fingerprint;
use crate::profiling;

use super::node::NodePtr;

/// Number of nodes retained before LRU eviction kicks in.
pub const DEFAULT_NODE_CACHE_CAPACITY: usize = 1024;

static NODE_CACHE: Lazy<Mutex<LruCache<Fingerprint, NodePtr>>> = Lazy::new(|| {
    Mutex::new(LruCache::new(
        NonZeroUsize::new(DEFAULT_NODE_CACHE_CAPACITY).expect("capacity is non-zero"),
    ))
});

/// Looks up a previously inserted node by its primary fingerprint.
pub fn lookup(hash: Fingerprint) -> Option<NodePtr> {
    let mut cache = NODE_CACHE.lock().expect("node cache poisoned");
    match cache.get(&hash) {
        Some(node) => {
            profiling::cache_event("node_cache_hit");
            Some(Arc::clone(node))
        }
        None => {
            profiling::cache_event("node_cache_miss");
            None
        }
    }
}

/// Makes `node` available for reuse under its primary fingerprint.
pub fn insert(node: &NodePtr) {
    let mut cache = NODE_CACHE.lock().expect("node cache poisoned");
    if let Some((evicted, _)) = cache.push(node.hash(), Arc::clone(node)) {
        if evicted != node.hash() {
            profiling::cache_event("node_cache_evict");
        }
    }
}

/// Drops every cached node.
pub fn clear() {
    let mut cache = NODE_CACHE.lock().expect("node cache poisoned");
    cache.clear();
}
