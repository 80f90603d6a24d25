//! Inverse of the mapping-pool encoding.
//!
//! Used to verify compiled output and to render diagnostics. It walks the
//! same byte layout a host reader would, but makes no attempt to apply the
//! mappings.

use crate::layout::ButtonId;
use crate::varint;

/// Structural problems found while walking a compiled region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("offset {offset} is past the end of a {len}-byte region")]
    OutOfBounds { offset: usize, len: usize },

    #[error("record {record} at offset {offset} is truncated")]
    Truncated { record: usize, offset: usize },

    #[error("malformed action index in record {record} at offset {offset}")]
    BadActionIndex { record: usize, offset: usize },

    #[error("unterminated string at offset {offset}")]
    Unterminated { offset: usize },

    #[error("string at offset {offset} is not valid UTF-8 after {valid_up_to} bytes")]
    InvalidUtf8 { offset: usize, valid_up_to: usize },
}

/// One record read back from a mapping pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub button: ButtonId,
    /// Byte offset into the action pool, when the record has a label.
    pub action_index: Option<u32>,
    /// Key codes; interleaved pairs for analog records.
    pub keys: Vec<u8>,
}

/// Decode the mapping set whose count byte sits at `offset` in `pool`.
pub fn decode_mapping_set(pool: &[u8], offset: usize) -> Result<Vec<DecodedRecord>, DecodeError> {
    let count = *pool.get(offset).ok_or(DecodeError::OutOfBounds {
        offset,
        len: pool.len(),
    })?;

    let mut records = Vec::with_capacity(usize::from(count));
    let mut pos = offset + 1;
    for record in 0..usize::from(count) {
        let header = *pool
            .get(pos)
            .ok_or(DecodeError::Truncated { record, offset: pos })?;
        let button = ButtonId::decode(header);
        pos += 1;

        let action_index = if button.has_action {
            let rest = pool.get(pos..).unwrap_or_default();
            let (index, used) =
                varint::decode(rest).ok_or(DecodeError::BadActionIndex { record, offset: pos })?;
            pos += used;
            Some(index)
        } else {
            None
        };

        let end = pos + button.key_bytes();
        let keys = pool
            .get(pos..end)
            .ok_or(DecodeError::Truncated { record, offset: pos })?
            .to_vec();
        pos = end;

        records.push(DecodedRecord {
            button,
            action_index,
            keys,
        });
    }
    Ok(records)
}

/// Read the null-terminated string starting at `offset`.
pub fn read_cstr(pool: &[u8], offset: usize) -> Result<&str, DecodeError> {
    let tail = pool.get(offset..).ok_or(DecodeError::OutOfBounds {
        offset,
        len: pool.len(),
    })?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(DecodeError::Unterminated { offset })?;
    let bytes = tail.get(..end).unwrap_or_default();
    std::str::from_utf8(bytes).map_err(|err| DecodeError::InvalidUtf8 {
        offset,
        valid_up_to: err.valid_up_to(),
    })
}

/// Read a title record (year offset byte, then name) from a title pool.
pub fn read_title(pool: &[u8], offset: usize) -> Result<(u8, &str), DecodeError> {
    let year = *pool.get(offset).ok_or(DecodeError::OutOfBounds {
        offset,
        len: pool.len(),
    })?;
    Ok((year, read_cstr(pool, offset + 1)?))
}
