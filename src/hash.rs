//! Hash vector generation.
//!
//! Derives k deterministic 64-bit bit-indices from a value and a storage-key
//! salt using MurmurHash3's 128-bit variant plus Kirsch-Mitzenmacher double
//! hashing.

use std::io::Cursor;

/// Computes the two 64-bit base hashes (h1, h2) for `value` salted by `key`.
///
/// `key` is prepended to `value` before hashing so that the same value under
/// two different storage keys produces unrelated hash output -- this is what
/// makes groups and distinct named filters statistically isolated even when
/// they share an in-memory backend.
fn base_hashes(key: &[u8], value: &[u8]) -> (u64, u64) {
    let mut combined = Vec::with_capacity(key.len() + value.len());
    combined.extend_from_slice(key);
    combined.extend_from_slice(value);

    let mut cursor = Cursor::new(&combined);
    let hash = murmur3::murmur3_x64_128(&mut cursor, 0).unwrap_or(0);
    let h1 = hash as u64;
    let h2 = (hash >> 64) as u64;
    (h1, h2)
}

/// Produces exactly `k` bit-indices for `value` salted by `key`.
///
/// Uses double hashing: `index_i = h1 + i * h2`, computed with wrapping
/// (modular) 64-bit arithmetic so overflow never panics. Indices are *not*
/// reduced modulo the backend's capacity here -- that reduction is the
/// backend's job, since only the backend knows its own size.
///
/// Deterministic and pure: the same `(key, value, k)` always yields the same
/// vector, across processes and across backends.
pub fn hash_vector(key: &[u8], value: &[u8], k: usize) -> Vec<u64> {
    let (h1, h2) = base_hashes(key, value);
    (0..k as u64)
        .map(|i| h1.wrapping_add(i.wrapping_mul(h2)))
        .collect()
}
