//! Declarative field extraction from HTML and delimited text
//!
//! A JSON configuration names a reader, a map of fields and a writer:
//! - the reader parses one input file and extracts each field by path
//!   (a CSS selector for HTML, a column index for delimited text);
//! - each field's values run through a chain of named filters;
//! - the assembled [`Record`] is validated against its shape and handed to
//!   the writer (JSON array, PHP array literal, CSV row, printout).

pub mod config;
pub mod error;
pub mod filters;
pub mod importer;
pub mod logging;
pub mod markup;
pub mod reader;
pub mod record;
pub mod registry;
pub mod value;
pub mod writer;

pub use config::{Config, FieldSpec, Settings};
pub use error::{ImportError, Result};
pub use importer::Importer;
pub use record::Record;
pub use value::Value;
