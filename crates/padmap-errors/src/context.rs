//! Classification and value types carried by [`CompileError`](crate::CompileError).

use core::fmt;

/// Error category for classification and exit-status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// The catalogue itself is malformed or inconsistent
    Catalogue = 0,
    /// A fixed table or region capacity was exhausted
    Capacity = 1,
    /// An external collaborator (compressor) failed
    Collaborator = 2,
    /// The compiler was configured with impossible parameters
    Config = 3,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Catalogue => write!(f, "Catalogue"),
            ErrorCategory::Capacity => write!(f, "Capacity"),
            ErrorCategory::Collaborator => write!(f, "Collaborator"),
            ErrorCategory::Config => write!(f, "Config"),
        }
    }
}

/// Kind of name that failed registry resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Keyboard key or extended action name
    Key,
    /// Pad button, analog half-axis or wheel name
    Input,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Key => write!(f, "key"),
            SymbolKind::Input => write!(f, "input"),
        }
    }
}

/// Mandatory title field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleField {
    /// Display name
    Name,
    /// Release year
    Year,
    /// Identifying (file, size) pairs
    Identifiers,
    /// Input bindings
    Bindings,
}

impl fmt::Display for TitleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleField::Name => write!(f, "name"),
            TitleField::Year => write!(f, "year"),
            TitleField::Identifiers => write!(f, "identifiers"),
            TitleField::Bindings => write!(f, "input mappings"),
        }
    }
}

/// Length-limited region of the compiled layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Per-bucket identification table plus title pool
    Idents,
    /// Per-bucket mapping-set pool (16-bit offsets)
    Mappings,
    /// Per-bucket title pool (16-bit offsets)
    Titles,
    /// Per-bucket action-string pool
    Actions,
    /// Record count of a single mapping set (8-bit)
    MappingSet,
    /// Compressed or uncompressed emitted blob (32-bit lengths)
    Blob,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Idents => write!(f, "identification data"),
            Region::Mappings => write!(f, "mapping data"),
            Region::Titles => write!(f, "title data"),
            Region::Actions => write!(f, "action data"),
            Region::MappingSet => write!(f, "mapping set"),
            Region::Blob => write!(f, "emitted blob"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Catalogue.to_string(), "Catalogue");
        assert_eq!(ErrorCategory::Capacity.to_string(), "Capacity");
        assert_eq!(ErrorCategory::Collaborator.to_string(), "Collaborator");
    }

    #[test]
    fn test_title_field_display() {
        assert_eq!(TitleField::Bindings.to_string(), "input mappings");
        assert_eq!(TitleField::Identifiers.to_string(), "identifiers");
    }

    #[test]
    fn test_region_display() {
        assert_eq!(Region::Idents.to_string(), "identification data");
        assert_eq!(Region::MappingSet.to_string(), "mapping set");
    }
}
