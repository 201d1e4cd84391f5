//! In-process counters for cache behaviour.
//!
//! Deliberately minimal: named event counters that tests and diagnostics can read back.
//! There is no external metrics surface.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;

static CACHE_EVENTS: Lazy<Mutex<HashMap<&'static str, u64>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Records one occurrence of a named cache event.
pub fn cache_event(name: &'static str) {
    let mut events = CACHE_EVENTS.lock().expect("cache event counters poisoned");
    *events.entry(name).or_insert(0) += 1;
}

/// Current count for a named cache event.
pub fn cache_event_count(name: &'static str) -> u64 {
    let events = CACHE_EVENTS.lock().expect("cache event counters poisoned");
    events.get(name).copied().unwrap_or(0)
}

/// Returns all counters and resets them to zero.
pub fn take_cache_events() -> HashMap<&'static str, u64> {
    let mut events = CACHE_EVENTS.lock().expect("cache event counters poisoned");
    std::mem::take(&mut *events)
}
