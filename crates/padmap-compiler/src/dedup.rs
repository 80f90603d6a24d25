//! Structural deduplication of mapping sets.
//!
//! Titles with byte-identical mapping sets share one stored copy. New sets
//! are spread over the buckets round-robin in first-seen order.

use indexmap::IndexMap;
use padmap_errors::{CompileError, CompileResult, Region};
use padmap_format::{MAX_RECORDS_PER_SET, MAX_REGION_OFFSET, MapRef, varint};

use crate::bucket::Bucket;
use crate::normalize::MappingSet;

/// Result of committing one title's mapping set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub map: MapRef,
    /// The set was already stored by an earlier title
    pub reused: bool,
}

/// Registry of stored mapping sets, keyed by their raw encoding.
#[derive(Debug, Default)]
pub struct MappingDeduplicator {
    sets: IndexMap<Vec<u8>, MapRef>,
    label_counts: IndexMap<String, usize>,
    reused: usize,
}

impl MappingDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `set` once and return its reference.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::CapacityExceeded`] when the target bucket's
    /// mapping pool is past the 16-bit offset range, when the set has more
    /// than 255 records, or when an action index does not fit in 32 bits.
    pub fn commit(
        &mut self,
        title: &str,
        set: &MappingSet,
        buckets: &mut [Bucket],
    ) -> CompileResult<Commit> {
        let key = set.key();
        if let Some(&map) = self.sets.get(&key) {
            self.reused += 1;
            return Ok(Commit { map, reused: true });
        }

        let bucket_count = buckets.len();
        let bucket_index = self.sets.len() % bucket_count.max(1);
        let bucket = buckets.get_mut(bucket_index).ok_or_else(|| {
            CompileError::config(format!("no bucket {bucket_index} of {bucket_count}"))
        })?;

        let offset = bucket.mappings.len();
        let offset16 = u16::try_from(offset).map_err(|_overflow| {
            CompileError::capacity(
                Region::Mappings,
                offset,
                MAX_REGION_OFFSET,
                format!("title '{title}' in bucket {bucket_index}"),
            )
        })?;
        if set.len() > MAX_RECORDS_PER_SET {
            return Err(CompileError::capacity(
                Region::MappingSet,
                set.len(),
                MAX_RECORDS_PER_SET,
                format!("title '{title}'"),
            ));
        }
        let bucket_byte = u8::try_from(bucket_index)
            .map_err(|_overflow| CompileError::config(format!("bucket {bucket_index} exceeds 255")))?;
        let count = u8::try_from(set.len()).map_err(|_overflow| {
            CompileError::capacity(Region::MappingSet, set.len(), MAX_RECORDS_PER_SET, title)
        })?;

        let mut encoded = vec![count];
        for record in set.records() {
            encoded.push(record.button().encode());
            if let Some(label) = record.display_label() {
                let index = bucket.actions.intern(label.as_bytes());
                let index32 = u32::try_from(index).map_err(|_overflow| {
                    CompileError::capacity(Region::Actions, index, u32::MAX as usize, title)
                })?;
                varint::encode(index32, &mut encoded);
                *self.label_counts.entry(label).or_insert(0) += 1;
            }
            encoded.extend_from_slice(record.keys());
        }
        bucket.mappings.extend_from_slice(&encoded);
        bucket.mapping_sets += 1;

        let map = MapRef::new(bucket_byte, offset16);
        self.sets.insert(key, map);
        Ok(Commit { map, reused: false })
    }

    /// Distinct sets stored so far.
    pub fn distinct(&self) -> usize {
        self.sets.len()
    }

    /// Commits that resolved to an existing set.
    pub fn reused(&self) -> usize {
        self.reused
    }

    /// Labelled records per action label, over distinct sets, in first-seen order.
    pub fn label_counts(&self) -> &IndexMap<String, usize> {
        &self.label_counts
    }
}
