//! Append-only pool of null-terminated byte strings.
//!
//! A string's handle is the byte offset at which it was written, so the pool
//! bytes can be emitted verbatim and indexed directly by a reader.

use indexmap::IndexMap;

/// Deduplicating string pool.
#[derive(Debug, Clone, Default)]
pub struct InternPool {
    index: IndexMap<Vec<u8>, usize>,
    bytes: Vec<u8>,
}

impl InternPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of `entry`, appending `entry` and a terminating `\0` when it is new.
    pub fn intern(&mut self, entry: &[u8]) -> usize {
        if let Some(&offset) = self.index.get(entry) {
            return offset;
        }
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(entry);
        self.bytes.push(0);
        self.index.insert(entry.to_vec(), offset);
        offset
    }

    pub fn get(&self, entry: &[u8]) -> Option<usize> {
        self.index.get(entry).copied()
    }

    /// Offset the next new entry would receive.
    pub fn next_offset(&self) -> usize {
        self.bytes.len()
    }

    /// Pool length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of distinct entries.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Entries in insertion order with their offsets.
    pub fn entries(&self) -> impl Iterator<Item = (&[u8], usize)> {
        self.index.iter().map(|(entry, &offset)| (entry.as_slice(), offset))
    }
}
