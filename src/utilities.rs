use std::hash::{BuildHasher, Hash};

pub const BITS_PER_LEVEL: u32 = 5;
pub const MAX_DEPTH: u8 = (u32::BITS / BITS_PER_LEVEL) as u8; // inclusive

const CHUNK_MASK: u64 = (1 << BITS_PER_LEVEL) - 1;

/// Hashes a key into 32 bits by folding the upper half of a 64-bit hash.
pub fn hash_key<S: BuildHasher, K: Hash + ?Sized>(hasher_builder: &S, key: &K) -> u32 {
    let hash = hasher_builder.hash_one(key);

    (hash ^ (hash >> 32)) as u32
}

/// Returns a 5-bit slice of a hash consumed by a node at a depth.
pub fn chunk(hash: u32, depth: u8) -> u8 {
    ((u64::from(hash) >> (BITS_PER_LEVEL * u32::from(depth))) & CHUNK_MASK) as u8
}
