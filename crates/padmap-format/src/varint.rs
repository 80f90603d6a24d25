//! Big-endian base-128 integer codec used for action-string indices.
//!
//! Groups of 7 bits are written most-significant first. Every byte except the
//! last carries the continuation bit `0x80`. Values below `0x80` therefore
//! take one byte, which is why the warm action set is kept small.

/// Continuation flag on all but the final group.
pub const CONTINUATION: u8 = 0x80;

/// Payload bits per group.
pub const GROUP_BITS: u32 = 7;

/// Largest encoding of a `u32` (5 groups).
pub const MAX_ENCODED_LEN: usize = 5;

/// Number of bytes `value` occupies once encoded.
pub const fn encoded_len(value: u32) -> usize {
    let mut len = 1;
    let mut rest = value >> GROUP_BITS;
    while rest != 0 {
        len += 1;
        rest >>= GROUP_BITS;
    }
    len
}

/// Append the encoding of `value` to `out`, returning the number of bytes written.
pub fn encode(value: u32, out: &mut Vec<u8>) -> usize {
    let len = encoded_len(value);
    for group in (0..len).rev() {
        let shift = GROUP_BITS * group as u32;
        let bits = ((value >> shift) & 0x7F) as u8;
        out.push(if group == 0 { bits } else { bits | CONTINUATION });
    }
    len
}

/// Encode `value` into a fresh buffer.
pub fn encode_to_vec(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode(value, &mut out);
    out
}

/// Decode a value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` when the
/// input ends mid-value or the value does not fit in 32 bits.
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (consumed, &byte) in bytes.iter().enumerate().take(MAX_ENCODED_LEN) {
        if value.leading_zeros() < GROUP_BITS {
            return None;
        }
        value = (value << GROUP_BITS) | u32::from(byte & 0x7F);
        if byte & CONTINUATION == 0 {
            return Some((value, consumed + 1));
        }
    }
    None
}
