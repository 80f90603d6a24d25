//! Fixed layout constants and the small fixed-width records of the compiled blob.
//!
//! Per bucket, the uncompressed layout is:
//!
//! ```text
//! region A: identification table (IDENT_ENTRY_LEN * slots_per_bucket) ++ title pool
//! region B: mapping pool ++ action pool
//! ```
//!
//! Multi-byte integers inside records are big-endian.

use padmap_registry::{BUTTON_CODE_MASK, is_analog_code};

/// Length of a [`MapRef`] on the wire.
pub const MAP_REF_LEN: usize = 3;

/// Length of an [`IdentEntry`] on the wire.
pub const IDENT_ENTRY_LEN: usize = MAP_REF_LEN + 2;

/// Release years are stored as a one-byte offset from this epoch.
pub const YEAR_EPOCH: i64 = 1970;

/// Largest storable year offset.
pub const MAX_YEAR_OFFSET: i64 = 0xFF;

/// Largest offset addressable by a 16-bit title index or map offset.
pub const MAX_REGION_OFFSET: usize = 0xFFFF;

/// Largest number of records in one mapping set (count byte).
pub const MAX_RECORDS_PER_SET: usize = 0xFF;

/// Keys per binding (per half for analog records).
pub const MAX_KEYS_PER_BINDING: usize = 3;

/// Button byte flag: an action-string index follows.
pub const ACTION_FLAG: u8 = 0x20;

/// Button byte shift of the `keys - 1` field.
pub const KEY_COUNT_SHIFT: u32 = 6;

/// Separates the two halves of a merged analog label before interning.
pub const HALF_SEPARATOR: char = '\u{1}';

/// Replaces [`HALF_SEPARATOR`] in the interned label.
pub const HALF_SEPARATOR_DISPLAY: char = '/';

/// Label given to an analog half with no action text.
pub const NO_ACTION_LABEL: &str = "Nothing";

/// Handle to a deduplicated mapping set: bucket number plus byte offset of
/// the set's count byte inside that bucket's mapping pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MapRef {
    pub bucket: u8,
    pub offset: u16,
}

impl MapRef {
    pub const fn new(bucket: u8, offset: u16) -> Self {
        Self { bucket, offset }
    }

    pub const fn to_bytes(self) -> [u8; MAP_REF_LEN] {
        let [hi, lo] = self.offset.to_be_bytes();
        [self.bucket, hi, lo]
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [bucket, hi, lo, ..] => Some(Self::new(*bucket, u16::from_be_bytes([*hi, *lo]))),
            _ => None,
        }
    }
}

/// One identification table row: which mapping set and which title a
/// fingerprint resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdentEntry {
    pub map: MapRef,
    /// Byte offset of the title record inside the bucket's title pool.
    pub title: u16,
}

impl IdentEntry {
    pub const fn new(map: MapRef, title: u16) -> Self {
        Self { map, title }
    }

    pub const fn to_bytes(self) -> [u8; IDENT_ENTRY_LEN] {
        let [m0, m1, m2] = self.map.to_bytes();
        let [t0, t1] = self.title.to_be_bytes();
        [m0, m1, m2, t0, t1]
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let map = MapRef::from_bytes(bytes)?;
        match bytes.get(MAP_REF_LEN..IDENT_ENTRY_LEN)? {
            [hi, lo] => Some(Self::new(map, u16::from_be_bytes([*hi, *lo]))),
            _ => None,
        }
    }

    /// Unused rows are all zero.
    pub fn is_vacant(&self) -> bool {
        *self == Self::default()
    }
}

/// Decoded view of the leading byte of a mapping record.
///
/// ```text
/// bit 7..6  keys per half - 1
/// bit 5     action index follows
/// bit 4..0  target code
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId {
    pub code: u8,
    /// Keys per binding; analog records store twice this many key bytes.
    pub key_count: u8,
    pub has_action: bool,
}

impl ButtonId {
    /// Build a button id, or `None` when `key_count` is outside 1..=3 or the
    /// code does not fit in five bits.
    pub fn new(code: u8, key_count: usize, has_action: bool) -> Option<Self> {
        if !(1..=MAX_KEYS_PER_BINDING).contains(&key_count) || code > BUTTON_CODE_MASK {
            return None;
        }
        Some(Self {
            code,
            key_count: u8::try_from(key_count).ok()?,
            has_action,
        })
    }

    pub const fn is_analog(&self) -> bool {
        is_analog_code(self.code)
    }

    /// Number of key bytes that follow the record header.
    pub const fn key_bytes(&self) -> usize {
        let per_half = self.key_count as usize;
        if self.is_analog() { per_half * 2 } else { per_half }
    }

    pub const fn encode(&self) -> u8 {
        let flag = if self.has_action { ACTION_FLAG } else { 0 };
        ((self.key_count - 1) << KEY_COUNT_SHIFT) | flag | self.code
    }

    pub const fn decode(byte: u8) -> Self {
        Self {
            code: byte & BUTTON_CODE_MASK,
            key_count: (byte >> KEY_COUNT_SHIFT) + 1,
            has_action: byte & ACTION_FLAG != 0,
        }
    }
}

/// Convert a release year to its stored offset from [`YEAR_EPOCH`].
pub fn year_offset(year: i64) -> Option<u8> {
    year_offset_since(year, YEAR_EPOCH)
}

/// Convert a release year to a one-byte offset from `epoch`.
pub fn year_offset_since(year: i64, epoch: i64) -> Option<u8> {
    let offset = year.checked_sub(epoch)?;
    u8::try_from(offset).ok()
}
