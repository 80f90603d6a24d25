//! Content fingerprints for title identification.
//!
//! A fingerprint combines a 32-bit FNV hash of an identifying file's name
//! with the file's expected size. The host computes the same value while
//! walking a mounted disk, so both sides must agree bit for bit.

/// FNV-1 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV 32-bit prime.
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Value of an empty hash-table slot; no fingerprint may equal it.
pub const EMPTY_SLOT: u32 = 0;

/// Hash a file name (multiply, then xor each byte).
pub fn name_hash(name: &[u8]) -> u32 {
    name.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(byte)
    })
}

/// Mix a name hash with the file size.
pub const fn with_size(hash: u32, size: u32) -> u32 {
    hash ^ (size << 3)
}

/// Fingerprint of an identifying file.
pub fn fingerprint(file_name: &str, size: u32) -> u32 {
    with_size(name_hash(file_name.as_bytes()), size)
}
