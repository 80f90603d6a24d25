//! Unit tests for all error variants.
//!
//! Tests Display implementations, codes and category classification.

use padmap_errors::{CompileError, ErrorCategory, Region, SymbolKind, TitleField};

fn all_variants() -> Vec<CompileError> {
    vec![
        CompileError::UnknownSymbol {
            kind: SymbolKind::Key,
            name: "ctrl".into(),
            title: "Doom".into(),
            binding: "a: ctrl".into(),
        },
        CompileError::InvalidKeyCount {
            count: 4,
            title: "Doom".into(),
            binding: "a: q+w+e+r".into(),
        },
        CompileError::DuplicateBinding {
            title: "Doom".into(),
            binding: "a: z".into(),
        },
        CompileError::missing_field("Doom", TitleField::Identifiers),
        CompileError::InvalidYear {
            title: "Doom".into(),
            year: 1969,
            min: 1970,
            max: 2225,
        },
        CompileError::DuplicateFingerprint {
            fingerprint: 0xDEAD_BEEF,
            description: "DOOM.EXE for Doom".into(),
            existing: "DOOM.EXE for Doom II".into(),
        },
        CompileError::TableFull {
            title: "Doom".into(),
            capacity: 16,
        },
        CompileError::capacity(Region::MappingSet, 256, 255, "title 'Doom'"),
        CompileError::ReservedFingerprint {
            description: "X.EXE for Doom".into(),
        },
        CompileError::Compression {
            region: Region::Blob,
            bucket: 1,
            reason: "disk full".into(),
        },
        CompileError::config("bucket_count must be non-zero"),
        CompileError::EmbeddedNul {
            title: "Doom".into(),
            text: "Fi\0re".into(),
        },
    ]
}

mod display_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() {
        for variant in all_variants() {
            let msg = variant.to_string();
            assert!(!msg.is_empty(), "CompileError variant should have display message");
        }
    }

    #[test]
    fn test_title_named_in_catalogue_errors() {
        for variant in all_variants() {
            if variant.category() == ErrorCategory::Catalogue
                && !matches!(
                    variant,
                    CompileError::DuplicateFingerprint { .. }
                        | CompileError::ReservedFingerprint { .. }
                )
            {
                assert!(
                    variant.to_string().contains("Doom"),
                    "{variant} should name its title"
                );
            }
        }
    }

    #[test]
    fn test_embedded_nul_is_escaped_in_message() {
        let err = CompileError::EmbeddedNul {
            title: "Doom".into(),
            text: "Fi\0re".into(),
        };
        assert!(!err.to_string().contains('\0'));
        assert!(err.to_string().contains("Fi\\0re"));
    }

    #[test]
    fn test_fingerprint_rendered_as_hex() {
        let err = CompileError::DuplicateFingerprint {
            fingerprint: 0x12,
            description: "a".into(),
            existing: "b".into(),
        };
        assert!(err.to_string().contains("0x00000012"));
    }

    #[test]
    fn test_capacity_names_region() {
        let err = CompileError::capacity(Region::Mappings, 65_600, 0xFFFF, "bucket 3");
        let msg = err.to_string();
        assert!(msg.contains("mapping data"));
        assert!(msg.contains("bucket 3"));
    }
}

mod classification_tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_ordered() {
        let codes: Vec<u8> = all_variants().iter().map(CompileError::code).collect();
        let expected: Vec<u8> = (1..=12).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_capacity_category() {
        let err = CompileError::TableFull {
            title: "x".into(),
            capacity: 1,
        };
        assert_eq!(err.category(), ErrorCategory::Capacity);
        let err = CompileError::config("x");
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_std_error_impl() {
        for variant in all_variants() {
            let _: &dyn std::error::Error = &variant;
        }
    }
}
