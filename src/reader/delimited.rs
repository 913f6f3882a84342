//! Delimited-text reader
//!
//! Blank lines are skipped; every other line is one row split on a single
//! separator character. Paths are column indices.

use super::{decode, Reader};
use crate::error::{ImportError, Result};
use crate::value::Value;
use std::path::Path;

pub struct DelimitedReader {
    separator: char,
}

/// Retained rows, each an ordered list of cells.
pub type Rows = Vec<Vec<String>>;

impl DelimitedReader {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }
}

impl Reader for DelimitedReader {
    type Document = Rows;

    fn parse(&self, raw: &[u8], _source: &Path) -> Result<Rows> {
        let text = decode(raw);
        let rows: Rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(self.separator).map(str::to_string).collect())
            .collect();
        tracing::debug!(rows = rows.len(), separator = %self.separator, "parsed delimited input");
        Ok(rows)
    }

    /// One entry per row: the cell at the column, or null when the row is
    /// too short.
    fn extract(&self, rows: &Rows, path: &str) -> Result<Vec<Value>> {
        let column: usize = path.trim().parse().map_err(|_| {
            ImportError::extraction(path, "column path must be a non-negative integer")
        })?;
        Ok(rows
            .iter()
            .map(|row| row.get(column).map_or(Value::Null, |cell| Value::from(cell.as_str())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(reader: &DelimitedReader, raw: &[u8]) -> Rows {
        reader.parse(raw, Path::new("in.csv")).unwrap()
    }

    #[test]
    fn test_columns() {
        let reader = DelimitedReader::new(';');
        let rows = parse(&reader, b"A;1 St\nB;2 St\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(
            reader.extract(&rows, "0").unwrap(),
            vec![Value::from("A"), Value::from("B")]
        );
        assert_eq!(
            reader.extract(&rows, "1").unwrap(),
            vec![Value::from("1 St"), Value::from("2 St")]
        );
    }

    #[test]
    fn test_short_rows_yield_null() {
        let reader = DelimitedReader::new(';');
        let rows = parse(&reader, b"A;1 St;x\nB\n");
        assert_eq!(
            reader.extract(&rows, "2").unwrap(),
            vec![Value::from("x"), Value::Null]
        );
        assert_eq!(reader.extract(&rows, "9").unwrap(), vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let reader = DelimitedReader::new(',');
        let rows = parse(&reader, b"\r\nA,1\r\n   \r\n\nB,2");
        assert_eq!(
            reader.extract(&rows, "1").unwrap(),
            vec![Value::from("1"), Value::from("2")]
        );
    }

    #[test]
    fn test_empty_cells_kept() {
        let reader = DelimitedReader::new(';');
        let rows = parse(&reader, b"A;;C\n");
        assert_eq!(reader.extract(&rows, "1").unwrap(), vec![Value::from("")]);
    }

    #[test]
    fn test_non_numeric_path() {
        let reader = DelimitedReader::new(';');
        let rows = parse(&reader, b"A;1\n");
        let err = reader.extract(&rows, "name").unwrap_err();
        assert_eq!(err.kind(), "extraction");
        assert!(reader.extract(&rows, "-1").is_err());
    }

    #[test]
    fn test_empty_input() {
        let reader = DelimitedReader::new(';');
        let rows = parse(&reader, b"");
        assert!(reader.extract(&rows, "0").unwrap().is_empty());
    }
}
