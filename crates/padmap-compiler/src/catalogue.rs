//! Serde model of the input catalogue.
//!
//! The catalogue is a YAML list of titles:
//!
//! ```yaml
//! - name: Commander Keen 4
//!   year: 1991
//!   identifiers:
//!     - { file: KEEN4E.EXE, size: 105004 }
//!   bindings:
//!     - { input: a, keys: leftctrl, action: Jump }
//!     - { input: lstick_left, keys: left, action: Move Left }
//!     - { input: lstick_right, keys: right, action: Move Right }
//!     - { input: x, keys: "leftalt+space" }
//! ```
//!
//! Purely numeric key names must be quoted (`keys: "1"`). Fields are
//! optional at this layer; the compiler reports absent ones as
//! [`CompileError::MissingField`](padmap_errors::CompileError::MissingField)
//! with the owning title attached.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Failure to read or parse a catalogue document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalogue: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Ordered list of titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    pub titles: Vec<TitleEntry>,
}

/// One title as written in the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

/// A file whose name and size identify the title on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub file: String,
    pub size: u32,
}

/// One input binding: a pad target, the keys it presses and an optional label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    pub input: String,
    pub keys: KeySpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Key names, either as a list or joined with `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    List(Vec<String>),
    Joined(String),
}

impl KeySpec {
    /// Individual key names, trimmed.
    ///
    /// Empty segments are kept so they fail key lookup; only a blank spec
    /// has no names at all.
    pub fn names(&self) -> Vec<&str> {
        match self {
            KeySpec::List(names) => names.iter().map(|n| n.trim()).collect(),
            KeySpec::Joined(joined) if joined.trim().is_empty() => Vec::new(),
            KeySpec::Joined(joined) => joined.split('+').map(str::trim).collect(),
        }
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::List(names) => write!(f, "{}", names.join("+")),
            KeySpec::Joined(joined) => write!(f, "{joined}"),
        }
    }
}

impl BindingEntry {
    pub fn new(input: impl Into<String>, keys: &str, action: Option<&str>) -> Self {
        Self {
            input: input.into(),
            keys: KeySpec::Joined(keys.to_string()),
            action: action.map(str::to_string),
        }
    }
}

/// Renders like a catalogue line, for error messages.
impl fmt::Display for BindingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input, self.keys)?;
        if let Some(action) = &self.action {
            write!(f, " {action}")?;
        }
        Ok(())
    }
}

impl TitleEntry {
    /// Name for diagnostics, with a placeholder when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Parse a catalogue from YAML text.
///
/// # Errors
///
/// Returns [`CatalogueError::Yaml`] when the document does not match the model.
pub fn load_yaml(text: &str) -> Result<Catalogue, CatalogueError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Read and parse a catalogue file.
///
/// # Errors
///
/// Returns [`CatalogueError::Io`] when the file cannot be read and
/// [`CatalogueError::Yaml`] when it cannot be parsed.
pub fn load_path(path: &Path) -> Result<Catalogue, CatalogueError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_yaml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const SAMPLE: &str = r#"
- name: Commander Keen 4
  year: 1991
  identifiers:
    - { file: KEEN4E.EXE, size: 105004 }
  bindings:
    - { input: a, keys: leftctrl, action: Jump }
    - { input: x, keys: "leftalt+space" }
    - { input: lstick_left, keys: [left], action: Move Left }
- name: Empty
"#;

    #[test]
    fn parses_titles_in_order() -> TestResult {
        let catalogue = load_yaml(SAMPLE)?;
        assert_eq!(catalogue.titles.len(), 2);

        let keen = &catalogue.titles[0];
        assert_eq!(keen.name.as_deref(), Some("Commander Keen 4"));
        assert_eq!(keen.year, Some(1991));
        assert_eq!(
            keen.identifiers,
            vec![Identifier {
                file: "KEEN4E.EXE".into(),
                size: 105_004
            }]
        );
        assert_eq!(keen.bindings.len(), 3);
        assert_eq!(keen.bindings[1].keys.names(), vec!["leftalt", "space"]);
        assert_eq!(keen.bindings[2].keys.names(), vec!["left"]);
        assert_eq!(keen.bindings[2].action.as_deref(), Some("Move Left"));

        let empty = &catalogue.titles[1];
        assert_eq!(empty.year, None);
        assert!(empty.identifiers.is_empty());
        assert!(empty.bindings.is_empty());
        Ok(())
    }

    #[test]
    fn joined_keys_keep_empty_segments() {
        let spec = KeySpec::Joined(" a + +b ".into());
        assert_eq!(spec.names(), vec!["a", "", "b"]);
        assert_eq!(KeySpec::Joined("z++x".into()).names(), vec!["z", "", "x"]);
        assert_eq!(KeySpec::List(vec!["z".into(), " ".into()]).names(), vec!["z", ""]);
        assert!(KeySpec::Joined(String::new()).names().is_empty());
        assert!(KeySpec::Joined("  ".into()).names().is_empty());
    }

    #[test]
    fn binding_renders_like_a_catalogue_line() {
        let binding = BindingEntry::new("lstick_up", "up+w", Some("Move Up"));
        assert_eq!(binding.to_string(), "lstick_up: up+w Move Up");
        let list = BindingEntry {
            input: "a".into(),
            keys: KeySpec::List(vec!["z".into(), "x".into()]),
            action: None,
        };
        assert_eq!(list.to_string(), "a: z+x");
    }

    #[test]
    fn rejects_non_list_document() {
        let result = load_yaml("name: not a list\n");
        assert!(matches!(result, Err(CatalogueError::Yaml(_))));
    }

    #[test]
    fn missing_file_reports_path() -> TestResult {
        let path = Path::new("/nonexistent/padmap/catalogue.yml");
        let Err(CatalogueError::Io { path: reported, .. }) = load_path(path) else {
            return Err("expected an I/O error".into());
        };
        assert_eq!(reported, path);
        Ok(())
    }
}
