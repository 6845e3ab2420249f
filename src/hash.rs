//! FNV-1 32-bit (the non-XOR variant), used to validate SimData schema and
//! table names. Distinct from, and not to be confused with, a GSI-style
//! bucketed hash table — SimData validates names by recomputing this hash
//! and comparing against the stored value, nothing more.

const FNV1_32_PRIME: u32 = 0x0100_0193;
const FNV1_32_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV-1 32-bit of `bytes`. An empty slice hashes to the offset basis
/// itself, `0x811C9DC5`.
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV1_32_OFFSET_BASIS;
    for &b in bytes {
        hash = hash.wrapping_mul(FNV1_32_PRIME);
        hash ^= u32::from(b);
    }
    hash
}

/// Names are validated lowercased; a missing name hashes as the empty
/// string.
pub fn fnv1_32_name(name: Option<&[u8]>) -> u32 {
    match name {
        None => fnv1_32(b""),
        Some(bytes) => fnv1_32(&bytes.to_ascii_lowercase()),
    }
}
