//! Per-bucket byte regions.

use padmap_errors::{CompileError, CompileResult, Region};
use padmap_format::{IDENT_ENTRY_LEN, IdentEntry, MAX_REGION_OFFSET};

use crate::intern::InternPool;

/// One bucket under construction.
#[derive(Debug, Clone)]
pub struct Bucket {
    index: usize,
    idents: Vec<IdentEntry>,
    titles: InternPool,
    pub(crate) mappings: Vec<u8>,
    pub(crate) actions: InternPool,
    pub(crate) mapping_sets: usize,
}

impl Bucket {
    /// Empty bucket with `rows` vacant identification entries and the warm
    /// action labels already interned.
    pub fn new(index: usize, rows: usize, warm_actions: &[String]) -> Self {
        let mut actions = InternPool::new();
        for action in warm_actions {
            actions.intern(action.as_bytes());
        }
        Self {
            index,
            idents: vec![IdentEntry::default(); rows],
            titles: InternPool::new(),
            mappings: Vec::new(),
            actions,
            mapping_sets: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset of the `(year, name)` title record, interning it when new.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::CapacityExceeded`] when a new record would
    /// start past the 16-bit title index range.
    pub fn intern_title(&mut self, name: &str, year_offset: u8) -> CompileResult<u16> {
        let mut entry = Vec::with_capacity(name.len() + 1);
        entry.push(year_offset);
        entry.extend_from_slice(name.as_bytes());

        let offset = match self.titles.get(&entry) {
            Some(offset) => offset,
            None => {
                let next = self.titles.next_offset();
                if next > MAX_REGION_OFFSET {
                    return Err(CompileError::capacity(
                        Region::Titles,
                        next,
                        MAX_REGION_OFFSET,
                        format!("title '{name}' in bucket {}", self.index),
                    ));
                }
                self.titles.intern(&entry)
            }
        };
        u16::try_from(offset).map_err(|_overflow| {
            CompileError::capacity(Region::Titles, offset, MAX_REGION_OFFSET, name)
        })
    }

    /// Write the identification entry for table row `row`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidConfig`] when `row` is outside this
    /// bucket's share of the table.
    pub fn place_ident(&mut self, row: usize, entry: IdentEntry) -> CompileResult<()> {
        let rows = self.idents.len();
        let slot = self.idents.get_mut(row).ok_or_else(|| {
            CompileError::config(format!(
                "identification row {row} outside bucket {} ({rows} rows)",
                self.index
            ))
        })?;
        *slot = entry;
        Ok(())
    }

    pub fn idents(&self) -> &[IdentEntry] {
        &self.idents
    }

    pub fn titles(&self) -> &InternPool {
        &self.titles
    }

    pub fn mappings(&self) -> &[u8] {
        &self.mappings
    }

    pub fn actions(&self) -> &InternPool {
        &self.actions
    }

    /// Distinct mapping sets stored in this bucket.
    pub fn mapping_sets(&self) -> usize {
        self.mapping_sets
    }

    /// Uncompressed regions in emission order.
    pub fn image(&self) -> BucketImage {
        let mut idents = Vec::with_capacity(self.idents.len() * IDENT_ENTRY_LEN + self.titles.len());
        for entry in &self.idents {
            idents.extend_from_slice(&entry.to_bytes());
        }
        idents.extend_from_slice(self.titles.bytes());

        let mut mappings = Vec::with_capacity(self.mappings.len() + self.actions.len());
        mappings.extend_from_slice(&self.mappings);
        mappings.extend_from_slice(self.actions.bytes());

        BucketImage {
            idents,
            mappings,
            action_offset: self.mappings.len(),
        }
    }
}

/// The two uncompressed regions of a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketImage {
    /// Identification table followed by the title pool
    pub idents: Vec<u8>,
    /// Mapping pool followed by the action pool
    pub mappings: Vec<u8>,
    /// Start of the action pool inside `mappings`
    pub action_offset: usize,
}

impl BucketImage {
    pub fn action_pool(&self) -> &[u8] {
        self.mappings.get(self.action_offset..).unwrap_or_default()
    }

    pub fn mapping_pool(&self) -> &[u8] {
        self.mappings.get(..self.action_offset).unwrap_or_default()
    }
}
