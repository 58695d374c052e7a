//! Identity hashing for component type deduplication
//!
//! This crate provides the deterministic, seeded byte-string hashes the
//! bundle registry uses to derive a stable 64-bit identity from a component
//! type's name:
//!
//! - [`hash_bytes`] - seeded Murmur-style 64-bit mixing hash for single
//!   buffers
//! - [`fnv1a`] - order-sensitive FNV-1a incremental hash for running byte
//!   streams
//! - [`type_hash`] - identity hash of a type's name under the fixed
//!   registry seed
//!
//! Hashes are stable within one process and are used for runtime equality
//! only; they are never persisted across runs or builds. There is no
//! collision-resolution policy: two type names that collide silently merge
//! into one identity, which is an accepted limitation.

/// Seed used for all type-identity hashes.
pub const TYPEID_SEED: u64 = 0xc70f6907;

/// FNV-1a 64-bit offset basis, the conventional starting value for [`fnv1a`].
pub const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;

const FNV_PRIME: u64 = 1099511628211;

/// Murmur 64-bit multiplier.
const MUL: u64 = (0xc6a4a793u64 << 32).wrapping_add(0x5bd1e995);

#[inline]
fn shift_mix(v: u64) -> u64 {
    v ^ (v >> 47)
}

/// Loads 1..=7 trailing bytes into a word, low byte first.
#[inline]
fn load_bytes(p: &[u8]) -> u64 {
    p.iter().rev().fold(0u64, |acc, &b| (acc << 8) + u64::from(b))
}

/// Seeded Murmur-style 64-bit hash of a byte buffer.
///
/// Pure and deterministic: equal inputs under equal seeds always produce
/// equal hashes. The main loop consumes native-endian 8-byte words; the
/// tail (fewer than 8 bytes) is loaded byte-wise, and the empty buffer
/// hashes to a function of the seed and length alone.
pub fn hash_bytes(data: &[u8], seed: u64) -> u64 {
    let mut hash = seed ^ (data.len() as u64).wrapping_mul(MUL);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        // chunks_exact guarantees 8 bytes
        let word = u64::from_ne_bytes(chunk.try_into().unwrap());
        let mixed = shift_mix(word.wrapping_mul(MUL)).wrapping_mul(MUL);
        hash ^= mixed;
        hash = hash.wrapping_mul(MUL);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        hash ^= load_bytes(tail);
        hash = hash.wrapping_mul(MUL);
    }

    hash = shift_mix(hash).wrapping_mul(MUL);
    shift_mix(hash)
}

/// Order-sensitive FNV-1a hash over a byte buffer.
///
/// Companion to [`hash_bytes`] for call sites that hash a running stream:
/// feed the returned value back in as `hash` for the next chunk. Start from
/// [`FNV_OFFSET_BASIS`]. The two algorithms are each internally
/// deterministic but do not agree with each other.
pub fn fnv1a(data: &[u8], hash: u64) -> u64 {
    data.iter().fold(hash, |h, &b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Identity hash of an arbitrary string under the registry seed.
pub fn identity_hash(name: &str) -> u64 {
    hash_bytes(name.as_bytes(), TYPEID_SEED)
}

/// Identity hash of a type, derived from its name.
///
/// `std::any::type_name` plays the role the demangled `typeid` name plays in
/// other runtimes: stable within one process, distinct for distinct types in
/// practice.
pub fn type_hash<T: ?Sized + 'static>() -> u64 {
    identity_hash(std::any::type_name::<T>())
}
