//! Writers serialize one validated record to a sink
//!
//! A sink is either a file named in the configuration or stdout. The JSON and
//! PHP writers rewrite the whole file on every call (read, append, write back);
//! concurrent runs against the same file race and the last rewrite wins.

pub mod csv;
pub mod json;
pub mod nop;
pub mod php;
pub mod print;

pub use self::csv::CsvWriter;
pub use self::json::JsonWriter;
pub use self::nop::NopWriter;
pub use self::php::PhpWriter;
pub use self::print::PrintWriter;

use crate::error::{ImportError, Result};
use crate::record::Record;
use crate::value::Value;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

pub trait Writer {
    fn name(&self) -> &'static str;

    fn write(&self, record: &Record) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    pub fn from_config(path: Option<&PathBuf>) -> Self {
        match path {
            Some(path) => Sink::File(path.clone()),
            None => Sink::Stdout,
        }
    }

    /// Append `data` to the file (created when missing) or write it to stdout.
    pub fn append(&self, data: &str) -> Result<()> {
        match self {
            Sink::Stdout => write_stdout(data),
            Sink::File(path) => {
                tracing::debug!(path = %path.display(), bytes = data.len(), "appending to sink");
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| ImportError::io(path, e))?;
                file.write_all(data.as_bytes())
                    .map_err(|e| ImportError::io(path, e))
            }
        }
    }
}

/// Current content of a sink file. A file that is missing or unreadable
/// counts as having no content.
pub(crate) fn read_existing(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => None,
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "sink not readable, starting empty");
            None
        }
    }
}

pub(crate) fn write_file(path: &Path, data: &str) -> Result<()> {
    tracing::debug!(path = %path.display(), bytes = data.len(), "writing sink");
    std::fs::write(path, data).map_err(|e| ImportError::io(path, e))
}

pub(crate) fn write_stdout(data: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(data.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| ImportError::io("<stdout>", e))
}

/// Flat text of a value for row-oriented sinks: nodes as markup, lists
/// joined by newlines, null as empty.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Node(el) => el.outer_html(),
        Value::List(items) => items.iter().map(cell_text).collect::<Vec<_>>().join("\n"),
        other => other.to_text(),
    }
}
