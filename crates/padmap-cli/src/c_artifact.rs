//! C header and source rendering of a compiled artifact.
//!
//! The blobs are embedded as string literals. Escaping keeps the literal
//! byte-exact: octal escapes are followed by escaped digits so a compiler
//! cannot extend them, and a second `?` is escaped to avoid trigraphs.

use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use padmap_compiler::Artifact;
use padmap_errors::{CompileError, CompileResult, Region};
use tracing::info;

use crate::error::CliError;

/// Longest blob emitted as a string literal; compilers cap literal length.
pub const MAX_LITERAL_LEN: usize = 65510;

/// Rendered characters per source line before the literal is split.
const LINE_BREAK_AT: usize = 950;

/// Slot values per line of the `map_keys` initializer.
const KEYS_PER_LINE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Plain,
    Octal,
    Trigraph,
}

fn escape_byte(byte: u8, is_last: bool, state: &mut Escape) -> Cow<'static, str> {
    let named = match byte {
        0x08 => Some("\\b"),
        0x0C => Some("\\f"),
        b'\n' => Some("\\n"),
        b'\r' => Some("\\r"),
        b'\t' => Some("\\t"),
        0x0B => Some("\\v"),
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        _ => None,
    };
    if let Some(text) = named {
        *state = Escape::Plain;
        return Cow::Borrowed(text);
    }

    match byte {
        b'?' => {
            let text = if *state == Escape::Trigraph { "\\?" } else { "?" };
            *state = Escape::Trigraph;
            Cow::Borrowed(text)
        }
        b'0'..=b'9' if *state == Escape::Octal => Cow::Owned(format!("\\{byte:o}")),
        b'0'..=b'9' => Cow::Owned(char::from(byte).to_string()),
        0x20..=0x7E => {
            *state = Escape::Plain;
            Cow::Owned(char::from(byte).to_string())
        }
        // the literal's own terminator stands in for a trailing zero
        0 if is_last => Cow::Borrowed(""),
        _ => {
            *state = Escape::Octal;
            Cow::Owned(format!("\\{byte:o}"))
        }
    }
}

/// Render `bytes` as a quoted C string literal, split across lines.
pub fn escape_c_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('"');
    let mut state = Escape::Plain;
    let mut line_len = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let piece = escape_byte(byte, i + 1 == bytes.len(), &mut state);
        line_len += piece.len();
        if line_len > LINE_BREAK_AT {
            out.push_str("\"\n\t\t\"");
            line_len = 0;
        }
        out.push_str(&piece);
    }
    out.push('"');
    out
}

fn literal(bytes: &[u8], region: Region, bucket: usize) -> CompileResult<String> {
    if bytes.len() > MAX_LITERAL_LEN {
        return Err(CompileError::capacity(
            Region::Blob,
            bytes.len(),
            MAX_LITERAL_LEN,
            format!("{region} of bucket {bucket} as a C string literal"),
        ));
    }
    Ok(escape_c_string(bytes))
}

/// Declarations shared by the generated source and its users.
pub fn render_header(artifact: &Artifact) -> String {
    format!(
        "#include \"include/config.h\"\n\
         \n\
         struct MAPBucket\n\
         {{\n\
         \tconst Bit8u* idents_compressed;\n\
         \tBit32u idents_size_compressed;\n\
         \tBit32u idents_size_uncompressed;\n\
         \tconst Bit8u* mappings_compressed;\n\
         \tBit32u mappings_size_compressed;\n\
         \tBit32u mappings_size_uncompressed;\n\
         \tBit32u mappings_action_offset;\n\
         }};\n\
         \n\
         enum {{ MAP_TABLE_SIZE = {}, MAP_BUCKETS = {} }};\n\
         extern const Bit32u map_keys[MAP_TABLE_SIZE];\n\
         extern const MAPBucket map_buckets[MAP_BUCKETS];\n",
        artifact.table_size, artifact.bucket_count
    )
}

/// Definitions of `map_keys` and `map_buckets`.
///
/// # Errors
///
/// Returns [`CompileError::CapacityExceeded`] when a blob is too long for a
/// string literal.
pub fn render_source(artifact: &Artifact, header_name: &str) -> CompileResult<String> {
    let mut out = String::new();
    out.push_str("// Generated by padmapc. Do not edit.\n\n");
    out.push_str(&format!("#include \"{header_name}\"\n"));
    out.push_str("\nconst Bit32u map_keys[MAP_TABLE_SIZE] = {");
    for (i, fingerprint) in artifact.slots.iter().enumerate() {
        if i != 0 {
            out.push(',');
        }
        if i % KEYS_PER_LINE == 0 {
            out.push_str("\n\t");
        }
        out.push_str(&fingerprint.to_string());
    }
    out.push_str("\n};\n\nconst MAPBucket map_buckets[MAP_BUCKETS] =\n{\n");

    for (index, bucket) in artifact.buckets.iter().enumerate() {
        let idents = literal(&bucket.idents.data, Region::Idents, index)?;
        let mappings = literal(&bucket.mappings.data, Region::Mappings, index)?;
        info!(
            bucket = index,
            "idents encoded as {} characters, mappings as {} characters",
            idents.len(),
            mappings.len()
        );
        out.push_str(&format!(
            "\t{{\n\
             \t\t(const Bit8u*){idents},\n\
             \t\t{},\n\
             \t\t{},\n\
             \t\t(const Bit8u*){mappings},\n\
             \t\t{},\n\
             \t\t{},\n\
             \t\t{},\n\
             \t}},\n",
            bucket.idents.compressed_len,
            bucket.idents.uncompressed_len,
            bucket.mappings.compressed_len,
            bucket.mappings.uncompressed_len,
            bucket.action_offset,
        ));
    }
    out.push_str("};\n");
    Ok(out)
}

/// Paths written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub header: PathBuf,
    pub source: PathBuf,
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `<stem>.h` and `<stem>.cpp`. Both are rendered before either is
/// written.
///
/// # Errors
///
/// Fails when rendering fails or either file cannot be written.
pub fn write_artifacts(artifact: &Artifact, stem: &Path) -> Result<WrittenFiles> {
    let header = with_suffix(stem, ".h");
    let source = with_suffix(stem, ".cpp");
    let header_name = header
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("output stem {} has no usable file name", stem.display()))?;

    let header_text = render_header(artifact);
    let source_text = render_source(artifact, header_name)?;

    info!("Writing {} ...", header.display());
    fs::write(&header, header_text)
        .map_err(CliError::Io)
        .with_context(|| format!("failed to write {}", header.display()))?;
    info!("Writing {} ...", source.display());
    fs::write(&source, source_text)
        .map_err(CliError::Io)
        .with_context(|| format!("failed to write {}", source.display()))?;

    Ok(WrittenFiles { header, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use padmap_compiler::{CompressedBlob, EmittedBucket};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    /// Inverse of [`escape_c_string`] for the escapes it produces.
    fn unescape(literal: &str) -> Result<Vec<u8>, String> {
        let joined = literal.replace("\"\n\t\t\"", "");
        let inner = joined
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or("literal is not quoted")?;

        let mut out = Vec::new();
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(u8::try_from(c).map_err(|e| e.to_string())?);
                continue;
            }
            let escaped = chars.next().ok_or("dangling backslash")?;
            let byte = match escaped {
                'b' => 0x08,
                'f' => 0x0C,
                'n' => b'\n',
                'r' => b'\r',
                't' => b'\t',
                'v' => 0x0B,
                '"' => b'"',
                '\\' => b'\\',
                '?' => b'?',
                '0'..='7' => {
                    let mut value = escaped.to_digit(8).ok_or("octal")?;
                    for _ in 0..2 {
                        match chars.peek().and_then(|d| d.to_digit(8)) {
                            Some(digit) => {
                                value = value * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    u8::try_from(value).map_err(|e| e.to_string())?
                }
                other => return Err(format!("unexpected escape \\{other}")),
            };
            out.push(byte);
        }
        Ok(out)
    }

    fn blob(data: &[u8], uncompressed_len: u32) -> CompressedBlob {
        CompressedBlob {
            data: data.to_vec(),
            compressed_len: u32::try_from(data.len()).unwrap_or(u32::MAX),
            uncompressed_len,
        }
    }

    fn artifact(slots: Vec<u32>, blobs: Vec<(Vec<u8>, Vec<u8>, u32)>) -> Artifact {
        Artifact {
            table_size: slots.len(),
            bucket_count: blobs.len(),
            slots,
            buckets: blobs
                .into_iter()
                .map(|(idents, mappings, action_offset)| EmittedBucket {
                    idents: blob(&idents, 100),
                    mappings: blob(&mappings, 50),
                    action_offset,
                })
                .collect(),
            compressor: "stored",
        }
    }

    #[test]
    fn printable_bytes_pass_through() {
        assert_eq!(escape_c_string(b"Jump"), "\"Jump\"");
        assert_eq!(escape_c_string(b""), "\"\"");
    }

    #[test]
    fn named_escapes() {
        assert_eq!(escape_c_string(b"\"\\\n\t"), r#""\"\\\n\t""#);
        assert_eq!(escape_c_string(&[0x08, 0x0C, 0x0B, b'\r']), r#""\b\f\v\r""#);
    }

    #[test]
    fn digits_after_octal_are_escaped() {
        assert_eq!(escape_c_string(&[1, b'2', b'x', b'3']), r#""\1\62x3""#);
        assert_eq!(escape_c_string(&[0xFF, b'7']), r#""\377\67""#);
    }

    #[test]
    fn repeated_question_marks_avoid_trigraphs() {
        assert_eq!(escape_c_string(b"??=?"), r#""?\?=?""#);
        assert_eq!(escape_c_string(b"?\n?"), r#""?\n?""#);
    }

    #[test]
    fn trailing_zero_uses_the_terminator() {
        assert_eq!(escape_c_string(&[b'a', 0]), "\"a\"");
        assert_eq!(escape_c_string(&[0, b'a']), r#""\0a""#);
    }

    #[test]
    fn long_literals_are_split() {
        let rendered = escape_c_string(&[b'A'; 951]);
        let expected = format!("\"{}\"\n\t\t\"A\"", "A".repeat(950));
        assert_eq!(rendered, expected);
    }

    #[test]
    fn escaping_round_trips_every_byte() -> TestResult {
        let mut bytes: Vec<u8> = (0..=255).collect();
        bytes.extend((0..=255).rev());
        bytes.extend_from_slice(b"??\x0012??3?");
        bytes.extend(std::iter::repeat_n(0x01, 2000));
        bytes.push(7);
        let rendered = escape_c_string(&bytes);
        assert!(rendered.lines().all(|line| line.len() < LINE_BREAK_AT + 16));
        assert_eq!(unescape(&rendered)?, bytes);
        Ok(())
    }

    #[test]
    fn header_declares_table_and_buckets() {
        let header = render_header(&artifact(vec![0; 8], vec![(vec![], vec![], 0), (vec![], vec![], 0)]));
        assert!(header.starts_with("#include \"include/config.h\"\n\nstruct MAPBucket\n{\n"));
        assert!(header.contains("\tBit32u mappings_action_offset;\n};\n"));
        assert!(header.contains("enum { MAP_TABLE_SIZE = 8, MAP_BUCKETS = 2 };\n"));
        assert!(header.ends_with("extern const MAPBucket map_buckets[MAP_BUCKETS];\n"));
    }

    #[test]
    fn source_lists_keys_and_buckets() -> TestResult {
        let source = render_source(
            &artifact(vec![0, 17, 0, 4_000_000_000], vec![(b"ab".to_vec(), b"c?".to_vec(), 2)]),
            "map.h",
        )?;
        assert!(source.contains("#include \"map.h\"\n"));
        assert!(source.contains("map_keys[MAP_TABLE_SIZE] = {\n\t0,17,0,4000000000\n};\n\n"));
        assert!(source.contains(
            "{\n\t\t(const Bit8u*)\"ab\",\n\t\t2,\n\t\t100,\n\t\t(const Bit8u*)\"c?\",\n\t\t2,\n\t\t50,\n\t\t2,\n\t},\n};\n"
        ));
        Ok(())
    }

    #[test]
    fn key_lines_wrap_every_128_entries() -> TestResult {
        let source = render_source(&artifact(vec![1; 130], vec![(vec![], vec![], 0)]), "map.h")?;
        let body = source
            .split_once("= {")
            .and_then(|(_, rest)| rest.split_once("\n};"))
            .map(|(body, _)| body)
            .ok_or("no map_keys body")?;
        let lines: Vec<&str> = body.split("\n\t").skip(1).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('1').count(), 128);
        assert_eq!(lines[1], "1,1");
        Ok(())
    }

    #[test]
    fn oversized_blob_is_refused() {
        let big = vec![b'x'; MAX_LITERAL_LEN + 1];
        let err = render_source(&artifact(vec![0; 4], vec![(vec![], big, 0)]), "map.h").err();
        assert!(matches!(
            err,
            Some(CompileError::CapacityExceeded {
                region: Region::Blob,
                actual,
                limit: MAX_LITERAL_LEN,
                ..
            }) if actual == MAX_LITERAL_LEN + 1
        ));
    }

    #[test]
    fn writes_header_and_source() -> TestResult {
        let dir = tempfile::tempdir()?;
        let stem = dir.path().join("keymaps");
        let written = write_artifacts(&artifact(vec![0; 4], vec![(b"i".to_vec(), b"m".to_vec(), 0)]), &stem)?;
        assert_eq!(written.header, dir.path().join("keymaps.h"));
        assert_eq!(written.source, dir.path().join("keymaps.cpp"));

        let source = fs::read_to_string(&written.source)?;
        assert!(source.contains("#include \"keymaps.h\""));
        assert!(fs::read_to_string(&written.header)?.contains("MAP_BUCKETS = 1"));
        Ok(())
    }

    #[test]
    fn failed_render_writes_nothing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let stem = dir.path().join("keymaps");
        let big = vec![b'x'; MAX_LITERAL_LEN + 1];
        let result = write_artifacts(&artifact(vec![0; 4], vec![(big, vec![], 0)]), &stem);
        assert!(matches!(result, Err(_)));
        assert!(!dir.path().join("keymaps.h").exists());
        Ok(())
    }

    #[test]
    fn unwritable_directory_is_an_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let stem = dir.path().join("missing").join("keymaps");
        let err = write_artifacts(&artifact(vec![0; 4], vec![(b"i".to_vec(), b"m".to_vec(), 0)]), &stem)
            .err()
            .ok_or("write succeeded")?;
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Io(_))));
        assert_eq!(crate::error::exit_code(&err), 6);
        Ok(())
    }
}
