//! Import configuration
//!
//! The configuration is a JSON object loaded once per invocation:
//!
//! ```json
//! {
//!     "reader": "html",
//!     "writer": "json",
//!     "result": "gallery",
//!     "main": "div#content",
//!     "jsonoutfile": "galleries.json",
//!     "imports": {
//!         "name": ["h1", "one", "inner_text"],
//!         "images": ["img", "attrib_src"]
//!     }
//! }
//! ```
//!
//! Each `imports` entry is `[path, filter...]`. Unknown keys are ignored so
//! reader- and writer-specific options can live side by side.

use crate::error::{ImportError, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Separator used by the delimited-text reader when `csvseparator` is unset.
pub const DEFAULT_SEPARATOR: char = ';';

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reader variant name (required)
    pub reader: String,
    /// Writer variant name, `nop` when absent
    #[serde(default)]
    pub writer: Option<String>,
    /// Record shape name, `base` when absent
    #[serde(default)]
    pub result: Option<String>,
    pub imports: FieldMap,
    #[serde(default, rename = "csvseparator")]
    pub csv_separator: Option<String>,
    /// Selector narrowing the markup reader to exactly one root element
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default, rename = "csvoutfile")]
    pub csv_out_file: Option<PathBuf>,
    #[serde(default, rename = "jsonoutfile")]
    pub json_out_file: Option<PathBuf>,
    #[serde(default, rename = "phpoutfile")]
    pub php_out_file: Option<PathBuf>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ImportError::Config {
            message: format!("invalid configuration JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "reading configuration");
        let json = std::fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        Self::from_json(&json)
    }

    /// The single-character column separator for delimited input.
    pub fn separator(&self) -> Result<char> {
        let Some(sep) = self.csv_separator.as_deref() else {
            return Ok(DEFAULT_SEPARATOR);
        };
        let mut chars = sep.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ImportError::config(format!(
                "csvseparator must be exactly one character, got {:?}",
                sep
            ))),
        }
    }
}

/// One field of the import: where to find it and how to filter it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct FieldSpec {
    pub path: String,
    pub filters: Vec<String>,
}

impl TryFrom<Vec<String>> for FieldSpec {
    type Error = String;

    fn try_from(mut parts: Vec<String>) -> std::result::Result<Self, Self::Error> {
        if parts.is_empty() {
            return Err("field spec must start with a path".to_string());
        }
        let path = parts.remove(0);
        Ok(FieldSpec {
            path,
            filters: parts,
        })
    }
}

/// Field name -> spec, in configuration order. Duplicate names are rejected
/// while deserializing, so every field is assigned at most once per import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(IndexMap<String, FieldSpec>);

impl FieldMap {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldSpec)> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field names to [path, filter...] arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<FieldMap, A::Error> {
                let mut fields = IndexMap::new();
                while let Some((name, spec)) = map.next_entry::<String, FieldSpec>()? {
                    if fields.contains_key(&name) {
                        return Err(de::Error::custom(format!("duplicate import field '{}'", name)));
                    }
                    fields.insert(name, spec);
                }
                Ok(FieldMap(fields))
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Process-wide constants, built once and handed to reader and writer
/// constructors.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub markup: MarkupOptions,
    pub output: OutputOptions,
}

/// Normalization applied to every parsed markup document.
#[derive(Debug, Clone)]
pub struct MarkupOptions {
    /// Drop comment nodes
    pub hide_comments: bool,
    /// Replace `<font>` elements by their children
    pub drop_font_tags: bool,
    /// Give empty `<iframe>` elements a single space of content
    pub pad_empty_iframes: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            hide_comments: true,
            drop_font_tags: true,
            pad_empty_iframes: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub pretty_json: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}
