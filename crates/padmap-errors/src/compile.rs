//! Compilation error taxonomy.
//!
//! Each variant names the offending title (and binding, where one exists) so
//! the message alone is enough to locate the bad catalogue entry.

use crate::context::{ErrorCategory, Region, SymbolKind, TitleField};

/// Fatal compilation error.
///
/// # Examples
///
/// ```
/// use padmap_errors::{CompileError, ErrorCategory};
///
/// let err = CompileError::TableFull { title: "Doom".into(), capacity: 4240 };
/// assert_eq!(err.code(), 7);
/// assert_eq!(err.category(), ErrorCategory::Capacity);
/// assert!(err.to_string().contains("Doom"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A key, button or axis name is not in the registry
    #[error("Unknown {kind} '{name}' in mapping '{binding}' of title '{title}'")]
    UnknownSymbol {
        /// Which registry the lookup went to
        kind: SymbolKind,
        /// The unresolved name
        name: String,
        /// Owning title
        title: String,
        /// Rendered binding line
        binding: String,
    },

    /// A binding lists zero or more than three keys
    #[error("Mapping '{binding}' of title '{title}' has {count} keys (expected 1 to 3)")]
    InvalidKeyCount {
        /// Number of keys supplied
        count: usize,
        /// Owning title
        title: String,
        /// Rendered binding line
        binding: String,
    },

    /// A button, or one half of an analog axis, is bound twice
    #[error("Duplicated input mapping '{binding}' of title '{title}'")]
    DuplicateBinding {
        /// Owning title
        title: String,
        /// Rendered binding line
        binding: String,
    },

    /// A mandatory title field is absent or empty
    #[error("Title '{title}' has no {field}")]
    MissingField {
        /// Title name, or a placeholder when the name itself is missing
        title: String,
        /// The missing field
        field: TitleField,
    },

    /// Release year cannot be stored as a one-byte offset from the epoch
    #[error("Invalid year {year} for title '{title}' (expected {min}..={max})")]
    InvalidYear {
        /// Owning title
        title: String,
        /// Year as given in the catalogue
        year: i64,
        /// First representable year
        min: i64,
        /// Last representable year
        max: i64,
    },

    /// Two different identification descriptions share a fingerprint
    #[error("Duplicate fingerprint {fingerprint:#010x}: {description} [{existing}]")]
    DuplicateFingerprint {
        /// The colliding fingerprint
        fingerprint: u32,
        /// Description being registered
        description: String,
        /// Description registered first
        existing: String,
    },

    /// Linear probing cycled through the whole table without a free slot
    #[error("Fingerprint table full ({capacity} slots) at title '{title}'")]
    TableFull {
        /// Title whose identifier could not be placed
        title: String,
        /// Table size in slots
        capacity: usize,
    },

    /// A length field of the layout would overflow
    #[error("{region} too large ({actual} > {limit}) at {context}")]
    CapacityExceeded {
        /// Region whose limit was hit
        region: Region,
        /// Size that was required
        actual: usize,
        /// Largest representable size
        limit: usize,
        /// Title or bucket where the limit was hit
        context: String,
    },

    /// A fingerprint equals the empty-slot marker and cannot be stored
    #[error("Fingerprint of {description} is zero, which marks an empty slot")]
    ReservedFingerprint {
        /// Description of the identifier
        description: String,
    },

    /// The compressor collaborator failed
    #[error("Compression of {region} in bucket {bucket} failed: {reason}")]
    Compression {
        /// Region being compressed
        region: Region,
        /// Bucket number
        bucket: usize,
        /// Collaborator message
        reason: String,
    },

    /// Compiler parameters cannot describe a valid layout
    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),

    /// A title name or action label contains a NUL byte, which would end
    /// its stored C string early
    #[error("Text {text:?} of title '{title}' contains a NUL byte")]
    EmbeddedNul {
        /// Owning title, as far as it is printable
        title: String,
        /// The offending name or label
        text: String,
    },
}

impl CompileError {
    /// Stable numeric code for this error kind.
    pub fn code(&self) -> u8 {
        match self {
            CompileError::UnknownSymbol { .. } => 1,
            CompileError::InvalidKeyCount { .. } => 2,
            CompileError::DuplicateBinding { .. } => 3,
            CompileError::MissingField { .. } => 4,
            CompileError::InvalidYear { .. } => 5,
            CompileError::DuplicateFingerprint { .. } => 6,
            CompileError::TableFull { .. } => 7,
            CompileError::CapacityExceeded { .. } => 8,
            CompileError::ReservedFingerprint { .. } => 9,
            CompileError::Compression { .. } => 10,
            CompileError::InvalidConfig(_) => 11,
            CompileError::EmbeddedNul { .. } => 12,
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::UnknownSymbol { .. }
            | CompileError::InvalidKeyCount { .. }
            | CompileError::DuplicateBinding { .. }
            | CompileError::MissingField { .. }
            | CompileError::InvalidYear { .. }
            | CompileError::DuplicateFingerprint { .. }
            | CompileError::ReservedFingerprint { .. }
            | CompileError::EmbeddedNul { .. } => ErrorCategory::Catalogue,
            CompileError::TableFull { .. } | CompileError::CapacityExceeded { .. } => {
                ErrorCategory::Capacity
            }
            CompileError::Compression { .. } => ErrorCategory::Collaborator,
            CompileError::InvalidConfig(_) => ErrorCategory::Config,
        }
    }

    /// Create a missing field error.
    pub fn missing_field(title: impl Into<String>, field: TitleField) -> Self {
        CompileError::MissingField {
            title: title.into(),
            field,
        }
    }

    /// Create a capacity error for a region.
    pub fn capacity(
        region: Region,
        actual: usize,
        limit: usize,
        context: impl Into<String>,
    ) -> Self {
        CompileError::CapacityExceeded {
            region,
            actual,
            limit,
            context: context.into(),
        }
    }

    /// Reject `text` when it holds a NUL byte.
    pub fn check_nul(title: &str, text: &str) -> Result<(), Self> {
        if text.contains('\0') {
            return Err(CompileError::EmbeddedNul {
                title: title.replace('\0', "\\0"),
                text: text.to_string(),
            });
        }
        Ok(())
    }

    /// Create an invalid configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        CompileError::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_taxonomy_order() {
        let err = CompileError::missing_field("Doom", TitleField::Identifiers);
        assert_eq!(err.code(), 4);
        let err = CompileError::capacity(Region::Mappings, 70000, 0xFFFF, "bucket 2");
        assert_eq!(err.code(), 8);
        assert_eq!(err.category(), ErrorCategory::Capacity);
    }

    #[test]
    fn test_missing_field_message_names_title() {
        let err = CompileError::missing_field("Commander Keen", TitleField::Year);
        assert_eq!(err.to_string(), "Title 'Commander Keen' has no year");
    }

    #[test]
    fn test_nul_check_escapes_the_title() {
        assert_eq!(CompileError::check_nul("Doom", "Fire"), Ok(()));
        let err = CompileError::check_nul("Do\0om", "Do\0om").err();
        assert_eq!(
            err,
            Some(CompileError::EmbeddedNul {
                title: "Do\\0om".into(),
                text: "Do\0om".into(),
            })
        );
        assert_eq!(err.map(|e| e.code()), Some(12));
    }

    #[test]
    fn test_compile_error_is_std_error() {
        let err = CompileError::config("zero buckets");
        let _: &dyn std::error::Error = &err;
    }
}
