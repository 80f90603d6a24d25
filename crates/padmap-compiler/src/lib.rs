//! Pad mapping catalogue compiler.
//!
//! Turns a catalogue of titles (identifying files plus keyboard-to-pad
//! bindings) into a fixed-size fingerprint table and a set of compressed
//! bucket blobs that a host can embed as read-only data.
//!
//! # Pipeline
//!
//! 1. [`normalize`]: bindings become canonical records; analog halves merge
//! 2. [`warm`]: pick the action labels pre-seeded into every bucket
//! 3. [`dedup`]: identical mapping sets are stored once, round-robin over buckets
//! 4. [`table`]: identifier fingerprints are placed by linear probing
//! 5. [`bucket`]: identification rows, titles, mappings and actions accumulate
//! 6. [`emit`]: each bucket's two regions go through a [`Compressor`]
//!
//! # Example
//!
//! ```
//! use padmap_compiler::{CompilerConfig, StoredCompressor, catalogue, compile_catalogue};
//!
//! let catalogue = catalogue::load_yaml(r#"
//! - name: Example
//!   year: 2000
//!   identifiers: [{ file: GAME.EXE, size: 12345 }]
//!   bindings: [{ input: a, keys: z }]
//! "#)?;
//! let artifact = compile_catalogue(&catalogue, &CompilerConfig::default(), &StoredCompressor)?;
//! assert_eq!(artifact.slots.iter().filter(|&&fp| fp != 0).count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(static_mut_refs)]

pub mod bucket;
pub mod catalogue;
pub mod compiler;
pub mod config;
pub mod dedup;
pub mod emit;
pub mod intern;
pub mod normalize;
pub mod table;
pub mod warm;

pub use bucket::{Bucket, BucketImage};
pub use catalogue::{BindingEntry, Catalogue, CatalogueError, Identifier, KeySpec, TitleEntry};
pub use compiler::{
    Assembly, BucketStats, CompileStats, Compiler, Identified, PreparedTitle, compile, prepare,
    resolve_warm_actions,
};
pub use config::{BUILTIN_WARM_ACTIONS, CompilerConfig, WarmActions};
pub use dedup::{Commit, MappingDeduplicator};
pub use emit::{
    Artifact, CompressedBlob, Compressor, DeflateCompressor, EmittedBucket, StoredCompressor,
};
pub use intern::InternPool;
pub use normalize::{MappingRecord, MappingSet, MappingSetBuilder, normalize_bindings};
pub use table::FingerprintTable;
pub use warm::compute_warm_set;

pub use padmap_errors::{CompileError, CompileResult};

/// Compile and compress a catalogue in one step.
///
/// # Errors
///
/// Any [`CompileError`] raised by [`compile`] or by emission.
pub fn compile_catalogue(
    catalogue: &Catalogue,
    config: &CompilerConfig,
    compressor: &dyn Compressor,
) -> CompileResult<Artifact> {
    compile(catalogue, config)?.emit(compressor)
}
