//! FNV-1a over raw key bytes.
//!
//! The accumulator is seeded with the 32-bit offset basis and multiplied by
//! the 32-bit prime, but arithmetic wraps at the native word width. On 64-bit
//! targets the result therefore differs from the canonical 32-bit FNV-1a once
//! the accumulator overflows 32 bits. Hashes are stable for the life of a
//! process; nothing here promises stability across targets or versions.

/// 32-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: usize = 0x811C_9DC5;

/// 32-bit FNV prime.
pub const FNV_PRIME: usize = 0x0100_0193;

/// Hash `bytes` with FNV-1a.
///
/// ```
/// use probe_table::hasher::{fnv1a, FNV_OFFSET_BASIS};
///
/// assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
/// assert_eq!(fnv1a(b"alpha\0"), fnv1a(b"alpha\0"));
/// ```
#[inline]
pub fn fnv1a(bytes: &[u8]) -> usize {
    bytes.iter().fold(FNV_OFFSET_BASIS, |acc, &b| {
        (acc ^ b as usize).wrapping_mul(FNV_PRIME)
    })
}

/// Home slot of `bytes` in a table of `capacity` slots.
#[inline]
pub fn home_index(bytes: &[u8], capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    fnv1a(bytes) % capacity
}
