//! Node reuse cache behaviour.
//!
//! The cache and its counters are process-wide, so tests serialize on a mutex in the
//! manner of the other global-state suites.

use std::sync::{Arc, Mutex};

use tracegraph::hashing::Fingerprint;
use tracegraph::ir::cache;
use tracegraph::profiling;
use tracegraph::{Node, OpKind};

static CACHE_TEST_MUTEX: Mutex<()> = Mutex::new(());

fn constant_hash(value: Fingerprint) -> impl Fn(bool) -> Fingerprint {
    move |_include_sizes| value
}

#[test]
fn lookup_returns_the_inserted_handle() {
    let _guard = CACHE_TEST_MUTEX.lock().expect("cache test mutex poisoned");
    cache::clear();

    let node = Node::new(OpKind::get("graph::add"), 1, constant_hash(0x1234_5678));
    cache::insert(&node);

    let reused = cache::lookup(node.hash()).expect("inserted node should be found");
    assert!(
        Arc::ptr_eq(&node, &reused),
        "cache must hand back the same allocation, not a copy"
    );
}

#[test]
fn miss_and_hit_are_counted() {
    let _guard = CACHE_TEST_MUTEX.lock().expect("cache test mutex poisoned");
    cache::clear();

    let misses_before = profiling::cache_event_count("node_cache_miss");
    let hits_before = profiling::cache_event_count("node_cache_hit");

    assert!(cache::lookup(0xdead_beef).is_none());
    assert_eq!(
        profiling::cache_event_count("node_cache_miss"),
        misses_before + 1
    );

    let node = Node::new(OpKind::get("graph::mul"), 1, constant_hash(0x9a9a_9a9a));
    cache::insert(&node);
    assert!(cache::lookup(node.hash()).is_some());
    assert_eq!(
        profiling::cache_event_count("node_cache_hit"),
        hits_before + 1
    );
}

#[test]
fn clear_drops_cached_nodes() {
    let _guard = CACHE_TEST_MUTEX.lock().expect("cache test mutex poisoned");
    cache::clear();

    let node = Node::new(OpKind::get("graph::sum"), 1, constant_hash(0x5050_5050));
    cache::insert(&node);
    assert!(cache::lookup(node.hash()).is_some());

    cache::clear();
    assert!(cache::lookup(node.hash()).is_none());
}
