//! Compression of bucket regions into the final artifact.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use padmap_errors::{CompileError, CompileResult, Region};
use tracing::{debug, info};

use crate::bucket::Bucket;

/// Byte-stream compressor applied to each emitted region.
///
/// Implementations must be deterministic and have a matching standard
/// decompressor on the reading side.
pub trait Compressor {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Compress `input` in full.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the encoder fails.
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Raw deflate (no zlib or gzip framing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateCompressor {
    level: u32,
}

impl DeflateCompressor {
    pub const DEFAULT_LEVEL: u32 = 9;

    /// Compressor at `level`, clamped to 0..=9.
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(Self::DEFAULT_LEVEL),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DeflateCompressor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

impl Compressor for DeflateCompressor {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(input)?;
        encoder.finish()
    }
}

/// Identity compressor, for inspecting uncompressed output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoredCompressor;

impl Compressor for StoredCompressor {
    fn name(&self) -> &'static str {
        "stored"
    }

    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

/// One compressed region with both of its lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBlob {
    pub data: Vec<u8>,
    pub compressed_len: u32,
    pub uncompressed_len: u32,
}

impl CompressedBlob {
    fn compress(
        compressor: &dyn Compressor,
        input: &[u8],
        region: Region,
        bucket: usize,
    ) -> CompileResult<Self> {
        let uncompressed_len = blob_len(input.len(), bucket)?;
        let data = compressor
            .compress(input)
            .map_err(|err| CompileError::Compression {
                region,
                bucket,
                reason: err.to_string(),
            })?;
        let compressed_len = blob_len(data.len(), bucket)?;
        Ok(Self {
            data,
            compressed_len,
            uncompressed_len,
        })
    }
}

fn blob_len(len: usize, bucket: usize) -> CompileResult<u32> {
    u32::try_from(len).map_err(|_overflow| {
        CompileError::capacity(
            Region::Blob,
            len,
            u32::MAX as usize,
            format!("bucket {bucket}"),
        )
    })
}

/// Compressed form of one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedBucket {
    /// Identification table and title pool
    pub idents: CompressedBlob,
    /// Mapping pool and action pool
    pub mappings: CompressedBlob,
    /// Start of the action pool inside the uncompressed mappings region
    pub action_offset: u32,
}

/// Everything a host needs to embed: the fingerprint slots and one pair of
/// blobs per bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub table_size: usize,
    pub bucket_count: usize,
    pub slots: Vec<u32>,
    pub buckets: Vec<EmittedBucket>,
    pub compressor: &'static str,
}

impl Artifact {
    /// Sum of all compressed blob lengths.
    pub fn compressed_total(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.idents.data.len() + b.mappings.data.len())
            .sum()
    }

    /// Compressed blobs plus the slot array.
    pub fn binary_total(&self) -> usize {
        self.compressed_total() + self.slots.len() * std::mem::size_of::<u32>()
    }
}

/// Compress every bucket's regions.
///
/// # Errors
///
/// Returns [`CompileError::Compression`] when the compressor fails and
/// [`CompileError::CapacityExceeded`] when a blob length does not fit in
/// 32 bits.
pub fn emit(slots: &[u32], buckets: &[Bucket], compressor: &dyn Compressor) -> CompileResult<Artifact> {
    let mut emitted = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let index = bucket.index();
        let image = bucket.image();
        debug!(
            "Bucket [{index}]: idents {} titles {} ({} bytes) mappings {} ({} bytes) actions {} ({} bytes)",
            bucket.idents().len(),
            bucket.titles().count(),
            bucket.titles().len(),
            bucket.mapping_sets(),
            bucket.mappings().len(),
            bucket.actions().count(),
            bucket.actions().len(),
        );

        let idents = CompressedBlob::compress(compressor, &image.idents, Region::Idents, index)?;
        let mappings = CompressedBlob::compress(compressor, &image.mappings, Region::Mappings, index)?;
        let action_offset = blob_len(image.action_offset, index)?;

        info!(
            bucket = index,
            "idents + titles {} -> {} bytes, mappings + actions {} -> {} bytes",
            idents.uncompressed_len,
            idents.compressed_len,
            mappings.uncompressed_len,
            mappings.compressed_len,
        );
        emitted.push(EmittedBucket {
            idents,
            mappings,
            action_offset,
        });
    }

    let artifact = Artifact {
        table_size: slots.len(),
        bucket_count: buckets.len(),
        slots: slots.to_vec(),
        buckets: emitted,
        compressor: compressor.name(),
    };
    info!(
        "Compressed total {} bytes, binary total {} bytes ({})",
        artifact.compressed_total(),
        artifact.binary_total(),
        artifact.compressor,
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    struct FailingCompressor;

    impl Compressor for FailingCompressor {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn compress(&self, _input: &[u8]) -> std::io::Result<Vec<u8>> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn deflate_round_trips() -> TestResult {
        let input = b"Move Left/Right\0Move Up/Down\0".repeat(20);
        let compressed = DeflateCompressor::default().compress(&input)?;
        assert!(compressed.len() < input.len());

        let mut decoded = Vec::new();
        DeflateDecoder::new(compressed.as_slice()).read_to_end(&mut decoded)?;
        assert_eq!(decoded, input);
        Ok(())
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(DeflateCompressor::new(42).level(), 9);
        assert_eq!(DeflateCompressor::new(0).level(), 0);
    }

    #[test]
    fn stored_is_identity() -> TestResult {
        assert_eq!(StoredCompressor.compress(b"abc")?, b"abc");
        Ok(())
    }

    #[test]
    fn emit_records_both_lengths() -> TestResult {
        let buckets = vec![Bucket::new(0, 2, &["Fire".into()]), Bucket::new(1, 2, &[])];
        let artifact = emit(&[0; 4], &buckets, &StoredCompressor)?;

        assert_eq!(artifact.table_size, 4);
        assert_eq!(artifact.bucket_count, 2);
        let first = &artifact.buckets[0];
        assert_eq!(first.idents.uncompressed_len, 10);
        assert_eq!(first.idents.compressed_len, 10);
        assert_eq!(first.mappings.data, b"Fire\0");
        assert_eq!(first.action_offset, 0);
        assert_eq!(artifact.compressed_total(), 10 + 5 + 10);
        assert_eq!(artifact.binary_total(), 25 + 16);
        Ok(())
    }

    #[test]
    fn compressor_failure_names_the_bucket() {
        let buckets = vec![Bucket::new(0, 1, &[])];
        let err = emit(&[0; 1], &buckets, &FailingCompressor).err();
        assert_eq!(
            err,
            Some(CompileError::Compression {
                region: Region::Idents,
                bucket: 0,
                reason: "disk on fire".into(),
            })
        );
    }
}
