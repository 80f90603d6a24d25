//! Compilation driver.
//!
//! A [`Compiler`] owns all mutable state of a run: the fingerprint table,
//! the buckets and the mapping-set registry. Titles are added in catalogue
//! order, which fixes every offset in the output.

use padmap_errors::{CompileError, CompileResult, TitleField};
use padmap_format::{
    DecodeError, DecodedRecord, IdentEntry, decode_mapping_set, fingerprint, read_cstr, read_title,
    year_offset_since,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::bucket::Bucket;
use crate::catalogue::{Catalogue, Identifier, TitleEntry};
use crate::config::{BUILTIN_WARM_ACTIONS, CompilerConfig, WarmActions};
use crate::dedup::MappingDeduplicator;
use crate::emit::{Artifact, Compressor, emit};
use crate::normalize::{MappingSet, normalize_bindings};
use crate::table::FingerprintTable;
use crate::warm::compute_warm_set;

/// A catalogue title after validation and binding normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTitle {
    pub name: String,
    pub year: i64,
    pub year_offset: u8,
    pub identifiers: Vec<Identifier>,
    pub mappings: MappingSet,
}

impl PreparedTitle {
    /// Validate `entry` and normalize its bindings.
    ///
    /// # Errors
    ///
    /// - [`CompileError::MissingField`] for an absent name, year, identifier
    ///   list or binding list
    /// - [`CompileError::InvalidYear`] when the year cannot be stored
    /// - [`CompileError::EmbeddedNul`] when the name holds a NUL byte
    /// - any normalization error of its bindings
    pub fn from_entry(entry: &TitleEntry, config: &CompilerConfig) -> CompileResult<Self> {
        let name = entry
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CompileError::missing_field(entry.display_name(), TitleField::Name))?;
        CompileError::check_nul(name, name)?;
        let year = entry
            .year
            .ok_or_else(|| CompileError::missing_field(name, TitleField::Year))?;
        if entry.bindings.is_empty() {
            return Err(CompileError::missing_field(name, TitleField::Bindings));
        }
        if entry.identifiers.is_empty() {
            return Err(CompileError::missing_field(name, TitleField::Identifiers));
        }
        let year_offset =
            year_offset_since(year, config.year_epoch).ok_or_else(|| CompileError::InvalidYear {
                title: name.to_string(),
                year,
                min: config.year_epoch,
                max: config.max_year(),
            })?;

        Ok(Self {
            name: name.to_string(),
            year,
            year_offset,
            identifiers: entry.identifiers.clone(),
            mappings: normalize_bindings(name, &entry.bindings)?,
        })
    }

    fn describe(&self, identifier: &Identifier) -> String {
        format!(
            "file {} (size {}) of title '{}' ({})",
            identifier.file, identifier.size, self.name, self.year
        )
    }
}

/// Validate and normalize every title, in order.
///
/// # Errors
///
/// Returns the first error of [`PreparedTitle::from_entry`].
pub fn prepare(catalogue: &Catalogue, config: &CompilerConfig) -> CompileResult<Vec<PreparedTitle>> {
    catalogue
        .titles
        .iter()
        .map(|entry| PreparedTitle::from_entry(entry, config))
        .collect()
}

/// Resolve the configured warm action source.
pub fn resolve_warm_actions(config: &CompilerConfig, titles: &[PreparedTitle]) -> Vec<String> {
    match &config.warm_actions {
        WarmActions::Builtin => BUILTIN_WARM_ACTIONS.iter().map(|a| (*a).to_string()).collect(),
        WarmActions::Computed => compute_warm_set(titles.iter().map(|t| &t.mappings)),
        WarmActions::Fixed(labels) => labels.clone(),
    }
}

/// Mutable state of one compilation run.
#[derive(Debug)]
pub struct Compiler {
    config: CompilerConfig,
    warm_actions: Vec<String>,
    table: FingerprintTable,
    buckets: Vec<Bucket>,
    dedup: MappingDeduplicator,
    titles: usize,
}

impl Compiler {
    /// Start a run with `warm_actions` seeded into every bucket.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: CompilerConfig, warm_actions: Vec<String>) -> CompileResult<Self> {
        config.validate()?;
        let rows = config.slots_per_bucket();
        let buckets = (0..config.bucket_count)
            .map(|index| Bucket::new(index, rows, &warm_actions))
            .collect();
        Ok(Self {
            table: FingerprintTable::new(config.table_size),
            buckets,
            dedup: MappingDeduplicator::new(),
            titles: 0,
            warm_actions,
            config,
        })
    }

    /// Store a title's mapping set and register all of its identifiers.
    ///
    /// # Errors
    ///
    /// Capacity and fingerprint errors from the deduplicator, the table and
    /// the buckets.
    pub fn add_title(&mut self, title: &PreparedTitle) -> CompileResult<()> {
        let commit = self
            .dedup
            .commit(&title.name, &title.mappings, &mut self.buckets)?;
        debug!(
            title = %title.name,
            bucket = commit.map.bucket,
            offset = commit.map.offset,
            reused = commit.reused,
            "committed mapping set"
        );

        let bucket_count = self.config.bucket_count;
        for identifier in &title.identifiers {
            let description = title.describe(identifier);
            let fp = fingerprint(&identifier.file, identifier.size);
            let slot = self
                .table
                .insert(fp, self.titles, &description, &title.name)?;

            let bucket_index = slot % bucket_count;
            let bucket = self.buckets.get_mut(bucket_index).ok_or_else(|| {
                CompileError::config(format!("slot {slot} maps to missing bucket {bucket_index}"))
            })?;
            let title_index = bucket.intern_title(&title.name, title.year_offset)?;
            bucket.place_ident(slot / bucket_count, IdentEntry::new(commit.map, title_index))?;
        }
        self.titles += 1;
        Ok(())
    }

    /// End the run.
    pub fn finish(self) -> Assembly {
        let stats = CompileStats::collect(&self);
        info!(
            "Titles: {}, hash table entries: {}, fill rate: {:.2}%, distinct mapping sets: {}",
            stats.titles,
            stats.hash_entries,
            stats.fill_rate * 100.0,
            stats.distinct_sets,
        );
        Assembly {
            config: self.config,
            warm_actions: self.warm_actions,
            table: self.table,
            buckets: self.buckets,
            stats,
        }
    }
}

/// Uncompressed result of a run.
#[derive(Debug)]
pub struct Assembly {
    pub config: CompilerConfig,
    pub warm_actions: Vec<String>,
    pub table: FingerprintTable,
    pub buckets: Vec<Bucket>,
    pub stats: CompileStats,
}

impl Assembly {
    pub fn slots(&self) -> &[u32] {
        self.table.slots()
    }

    /// Compress the buckets into an [`Artifact`].
    ///
    /// # Errors
    ///
    /// See [`emit`].
    pub fn emit(&self, compressor: &dyn Compressor) -> CompileResult<Artifact> {
        emit(self.table.slots(), &self.buckets, compressor)
    }

    /// Resolve an identifying file through the compiled regions, the way a
    /// reader would: slot, identification entry, title record, mapping set.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the compiled regions are inconsistent.
    pub fn identify(&self, file: &str, size: u32) -> Result<Option<Identified>, DecodeError> {
        let fp = fingerprint(file, size);
        let Some(slot) = self.table.lookup(fp) else {
            return Ok(None);
        };
        let bucket_count = self.buckets.len();
        let bucket = self.bucket(slot % bucket_count.max(1))?;
        let row = slot / bucket_count.max(1);
        let entry = *bucket.idents().get(row).ok_or(DecodeError::OutOfBounds {
            offset: row,
            len: bucket.idents().len(),
        })?;

        let (year_offset, title) = read_title(bucket.titles().bytes(), usize::from(entry.title))?;
        let map_bucket = self.bucket(usize::from(entry.map.bucket))?;
        let records = decode_mapping_set(map_bucket.mappings(), usize::from(entry.map.offset))?;
        let labels = records
            .iter()
            .map(|record| {
                record
                    .action_index
                    .map(|index| read_cstr(map_bucket.actions().bytes(), index as usize).map(str::to_string))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Identified {
            fingerprint: fp,
            slot,
            entry,
            year: self.config.year_epoch + i64::from(year_offset),
            title: title.to_string(),
            records,
            labels,
        }))
    }

    fn bucket(&self, index: usize) -> Result<&Bucket, DecodeError> {
        self.buckets.get(index).ok_or(DecodeError::OutOfBounds {
            offset: index,
            len: self.buckets.len(),
        })
    }
}

/// A fingerprint resolved back to its title and mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identified {
    pub fingerprint: u32,
    pub slot: usize,
    pub entry: IdentEntry,
    pub year: i64,
    pub title: String,
    pub records: Vec<DecodedRecord>,
    /// Action label of each record, in record order
    pub labels: Vec<Option<String>>,
}

/// Counters reported after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileStats {
    pub titles: usize,
    pub hash_entries: usize,
    pub table_size: usize,
    pub fill_rate: f64,
    pub distinct_sets: usize,
    pub reused_sets: usize,
    pub warm_actions: Vec<String>,
    /// Most frequent labels over distinct sets, most frequent first
    pub top_labels: Vec<(String, usize)>,
    pub buckets: Vec<BucketStats>,
}

/// Region sizes of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub index: usize,
    pub idents: usize,
    pub titles: usize,
    pub title_bytes: usize,
    pub mapping_sets: usize,
    pub mapping_bytes: usize,
    pub actions: usize,
    pub action_bytes: usize,
}

impl CompileStats {
    const TOP_LABELS: usize = 16;

    fn collect(compiler: &Compiler) -> Self {
        let bucket_count = compiler.config.bucket_count.max(1);
        let slots = compiler.table.slots();
        let buckets = compiler
            .buckets
            .iter()
            .map(|bucket| BucketStats {
                index: bucket.index(),
                idents: slots
                    .iter()
                    .enumerate()
                    .filter(|(slot, fp)| slot % bucket_count == bucket.index() && **fp != 0)
                    .count(),
                titles: bucket.titles().count(),
                title_bytes: bucket.titles().len(),
                mapping_sets: bucket.mapping_sets(),
                mapping_bytes: bucket.mappings().len(),
                actions: bucket.actions().count(),
                action_bytes: bucket.actions().len(),
            })
            .collect();

        let mut top_labels: Vec<(String, usize)> = compiler
            .dedup
            .label_counts()
            .iter()
            .map(|(label, &count)| (label.clone(), count))
            .collect();
        top_labels.sort_by(|a, b| b.1.cmp(&a.1));
        top_labels.truncate(Self::TOP_LABELS);

        let hash_entries = compiler.table.occupied();
        let table_size = compiler.table.capacity();
        Self {
            titles: compiler.titles,
            hash_entries,
            table_size,
            fill_rate: ratio(hash_entries, table_size),
            distinct_sets: compiler.dedup.distinct(),
            reused_sets: compiler.dedup.reused(),
            warm_actions: compiler.warm_actions.clone(),
            top_labels,
            buckets,
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Compile a catalogue into its uncompressed assembly.
///
/// # Errors
///
/// Any [`CompileError`]; no partial output is produced.
pub fn compile(catalogue: &Catalogue, config: &CompilerConfig) -> CompileResult<Assembly> {
    config.validate()?;
    let titles = prepare(catalogue, config)?;
    let warm_actions = resolve_warm_actions(config, &titles);
    info!("Warm action set: {} labels", warm_actions.len());

    let mut compiler = Compiler::new(config.clone(), warm_actions)?;
    for title in &titles {
        compiler.add_title(title)?;
    }
    Ok(compiler.finish())
}
