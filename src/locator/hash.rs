//! Key-hashing algorithms
//!
//! Routing hashes are a tagged variant held by the locator at construction;
//! adding an algorithm means adding a variant here, not editing callers.

/// Selects the hash used to map keys onto the node set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// Polynomial rolling hash: `h = 31*h + byte`, wrapping in u32
    #[default]
    Native,

    /// CRC-32 (IEEE), the hash used by the classic memcached clients
    Crc32,
}

/// Hash a key with the selected algorithm
///
/// Always non-negative by construction (u32), so `hash_key(..) % n` is a
/// valid index for any non-empty node set.
pub fn hash_key(key: &str, algorithm: HashAlgorithm) -> u32 {
    match algorithm {
        HashAlgorithm::Native => native_hash(key),
        HashAlgorithm::Crc32 => crc32fast::hash(key.as_bytes()),
    }
}

fn native_hash(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}
