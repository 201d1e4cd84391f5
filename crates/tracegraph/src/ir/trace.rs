//! Ordered record of every node created during one tracing session.
//!
//! Each OS thread owns an independent [`TraceSession`] held in a thread-local slot, so the
//! single-writer discipline the buffers rely on is structural rather than a documented
//! precondition. Node constructors append to the calling thread's session; a flush moves the
//! accumulated buffer aside for the downstream consumer and starts a fresh one.

use std::cell::RefCell;
use std::sync::Arc;

use super::node::{Node, NodePtr};

/// Two ordered buffers of node handles: the session being recorded and the one most
/// recently flushed.
///
/// The buffers own their nodes: a handle stays alive from construction until the *second*
/// flush after it (the flush that replaces the `last` buffer it sits in), unless other
/// owners remain. The type is usable standalone for architectures that thread an explicit
/// session through the call chain; the free functions in this module operate on the
/// thread-local instance the node constructors use.
#[derive(Default)]
pub struct TraceSession {
    current: Vec<NodePtr>,
    last: Vec<NodePtr>,
}

impl TraceSession {
    pub fn new() -> Self {
        TraceSession::default()
    }

    /// Index the next constructed node will occupy, i.e. the current buffer length.
    pub fn next_index(&self) -> usize {
        self.current.len()
    }

    /// Appends a node handle to the current buffer.
    pub fn push(&mut self, node: NodePtr) {
        self.current.push(node);
    }

    /// Ends the session: the current buffer becomes `last` (dropping the previous `last`
    /// and releasing its nodes) and recording restarts from an empty buffer.
    pub fn flush(&mut self) {
        self.last = std::mem::take(&mut self.current);
    }

    /// Nodes recorded since the last flush, in construction order.
    pub fn current(&self) -> &[NodePtr] {
        &self.current
    }

    /// The most recently flushed session, immutable until the next flush.
    pub fn last(&self) -> &[NodePtr] {
        &self.last
    }
}

thread_local! {
    static SESSION: RefCell<TraceSession> = RefCell::new(TraceSession::new());
}

/// Index the next node constructed on this thread will receive.
pub fn next_index() -> usize {
    SESSION.with(|session| session.borrow().next_index())
}

pub(crate) fn push(node: Node) -> NodePtr {
    let ptr = Arc::new(node);
    SESSION.with(|session| session.borrow_mut().push(Arc::clone(&ptr)));
    ptr
}

/// Flushes this thread's session.
pub fn flush() {
    SESSION.with(|session| session.borrow_mut().flush());
}

/// Snapshot of the most recently flushed session, ordered by trace index.
pub fn last_nodes() -> Vec<NodePtr> {
    SESSION.with(|session| session.borrow().last().to_vec())
}

/// Number of nodes recorded on this thread since the last flush.
pub fn current_len() -> usize {
    SESSION.with(|session| session.borrow().current().len())
}

/// Drops both buffers for this thread. Intended for tests and long-lived worker threads
/// that want to release node memory between unrelated workloads.
pub fn reset() {
    SESSION.with(|session| {
        let mut session = session.borrow_mut();
        session.current.clear();
        session.last.clear();
    });
}
