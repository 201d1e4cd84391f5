//! FNV-1a fingerprinting used for structural node identity.
//!
//! Fingerprints must stay stable across processes so downstream plan caches can key on
//! them, which rules out `DefaultHasher` and its randomized state. Everything here bottoms
//! out in the same FNV-1a core.

use anyhow::Result;
use serde::Serialize;

/// Fixed-width structural digest shared by nodes, edges, and cache keys.
pub type Fingerprint = u64;

const FNV1A_OFFSET: u64 = 0xcbf29ce484222325;
const FNV1A_PRIME: u64 = 0x100000001b3;

/// Returns the FNV-1a offset basis, the seed for incremental fingerprinting.
pub fn fnv1a_init() -> Fingerprint {
    FNV1A_OFFSET
}

/// Folds `bytes` into an existing fingerprint.
pub fn fnv1a_bytes(mut hash: Fingerprint, bytes: &[u8]) -> Fingerprint {
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV1A_PRIME);
    }
    hash
}

/// Fingerprints a byte slice from the offset basis.
pub fn fnv1a_hash(bytes: &[u8]) -> Fingerprint {
    fnv1a_bytes(fnv1a_init(), bytes)
}

/// Mixes two fingerprints into one. Order matters: `combine(a, b) != combine(b, a)`
/// in general, which keeps operand position part of the digest.
pub fn combine(lhs: Fingerprint, rhs: Fingerprint) -> Fingerprint {
    let mut buf = [0u8; 16];
    buf[..8].copy_from_slice(&lhs.to_le_bytes());
    buf[8..].copy_from_slice(&rhs.to_le_bytes());
    fnv1a_hash(&buf)
}

/// Fingerprints a string field.
pub fn fingerprint_str(value: &str) -> Fingerprint {
    fnv1a_hash(value.as_bytes())
}

/// Fingerprints an integer field.
pub fn fingerprint_usize(value: usize) -> Fingerprint {
    fnv1a_hash(&(value as u64).to_le_bytes())
}

/// Fingerprints any serializable value through its bincode encoding.
///
/// This is the convenient path for composite hash inputs (shape lists, attribute structs)
/// where hand-rolling field-by-field mixing is not worth the noise.
pub fn fingerprint_serializable<T: Serialize>(value: &T) -> Result<Fingerprint> {
    let bytes = bincode::serialize(value)?;
    Ok(fnv1a_hash(&bytes))
}
