//! Compiler parameters.

use padmap_errors::{CompileError, CompileResult};
use padmap_format::YEAR_EPOCH;
use serde::{Deserialize, Serialize};

/// Default number of buckets.
pub const DEFAULT_BUCKET_COUNT: usize = 4;

/// Default fingerprint table size.
pub const DEFAULT_TABLE_SIZE: usize = 1060 * DEFAULT_BUCKET_COUNT;

/// Bucket numbers are stored in one byte of a map reference.
pub const MAX_BUCKET_COUNT: usize = 256;

/// Most frequent action labels across the full catalogue, most frequent first.
///
/// Seeded into every bucket's action pool so they all land below index 128
/// and encode as a single varint byte.
pub const BUILTIN_WARM_ACTIONS: [&str; 14] = [
    "Start",
    "Move Left/Right",
    "Move Up/Down",
    "Pause",
    "Move Left",
    "Move Right",
    "Move Up",
    "Move Down",
    "Quit to Title",
    "Fire",
    "Jump",
    "Enter Key",
    "Accelerate",
    "Help",
];

/// Source of the action labels pre-seeded into every bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmActions {
    /// [`BUILTIN_WARM_ACTIONS`]
    #[default]
    Builtin,
    /// Derived from the catalogue being compiled
    Computed,
    /// Exactly these labels, in order
    Fixed(Vec<String>),
}

/// Layout parameters of a compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub bucket_count: usize,
    pub table_size: usize,
    pub year_epoch: i64,
    pub warm_actions: WarmActions,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            table_size: DEFAULT_TABLE_SIZE,
            year_epoch: YEAR_EPOCH,
            warm_actions: WarmActions::Builtin,
        }
    }
}

impl CompilerConfig {
    /// Reject parameters that cannot describe a valid layout.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidConfig`] when the bucket count is zero
    /// or above 256, or when the table size is zero or not a multiple of the
    /// bucket count.
    pub fn validate(&self) -> CompileResult<()> {
        if self.bucket_count == 0 || self.bucket_count > MAX_BUCKET_COUNT {
            return Err(CompileError::config(format!(
                "bucket count {} outside 1..={MAX_BUCKET_COUNT}",
                self.bucket_count
            )));
        }
        if self.table_size == 0 {
            return Err(CompileError::config("table size must be non-zero"));
        }
        if !self.table_size.is_multiple_of(self.bucket_count) {
            return Err(CompileError::config(format!(
                "table size {} is not a multiple of bucket count {}",
                self.table_size, self.bucket_count
            )));
        }
        Ok(())
    }

    /// Identification table rows owned by each bucket.
    pub fn slots_per_bucket(&self) -> usize {
        self.table_size / self.bucket_count.max(1)
    }

    /// Last year representable with the configured epoch.
    pub fn max_year(&self) -> i64 {
        self.year_epoch.saturating_add(padmap_format::MAX_YEAR_OFFSET)
    }
}
