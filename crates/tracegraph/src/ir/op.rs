//! Interned operator identifiers.

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::hashing::{fingerprint_str, Fingerprint};

static INTERNER: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Identifier for one traced operation, wrapping an interned qualified name.
///
/// The vocabulary is open: any name is accepted and interned on first use, so frontends can
/// introduce custom operators without touching this crate. Two `OpKind`s are equal iff their
/// qualified names are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OpKind {
    name: &'static str,
}

impl OpKind {
    /// Interns `name` (or finds the existing symbol) and returns its identifier.
    pub fn get(name: &str) -> OpKind {
        let mut interner = INTERNER.lock().expect("op interner poisoned");
        if let Some(&existing) = interner.get(name) {
            return OpKind { name: existing };
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        interner.insert(leaked);
        OpKind { name: leaked }
    }

    /// The interned qualified name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stable structural fingerprint of the qualified name.
    ///
    /// Derived from the name bytes, not the interner slot, so it is identical across
    /// processes and safe to feed into cache keys.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_str(self.name)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
