//! Compiled pad mapping layout.
//!
//! This crate is intentionally I/O-free. It defines the byte layout shared
//! by the compiler and any reader of the compiled data:
//!
//! - [`layout`]: record sizes, the encoded button byte, map references and
//!   identification entries
//! - [`varint`]: the base-128 codec for action-string indices
//! - [`fingerprint`]: file name + size fingerprints used as table keys
//! - [`decode`]: walking a compiled mapping pool back into records

#![deny(static_mut_refs)]

pub mod decode;
pub mod fingerprint;
pub mod layout;
pub mod varint;

pub use decode::{DecodeError, DecodedRecord, decode_mapping_set, read_cstr, read_title};
pub use fingerprint::{EMPTY_SLOT, fingerprint, name_hash};
pub use layout::{
    ACTION_FLAG, ButtonId, HALF_SEPARATOR, HALF_SEPARATOR_DISPLAY, IDENT_ENTRY_LEN, IdentEntry,
    MAP_REF_LEN, MAX_KEYS_PER_BINDING, MAX_RECORDS_PER_SET, MAX_REGION_OFFSET, MAX_YEAR_OFFSET,
    MapRef, NO_ACTION_LABEL, YEAR_EPOCH, year_offset, year_offset_since,
};
