//! One comma-separated row per record
//!
//! Values are quoted when they contain a comma, a quote, whitespace or a line
//! break; quotes inside are doubled. Lists become one cell with the elements
//! on separate lines.

use super::{cell_text, Sink, Writer};
use crate::error::Result;
use crate::record::Record;

const DELIMITER: char = ',';
const QUOTE: char = '"';

pub struct CsvWriter {
    sink: Sink,
}

impl CsvWriter {
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

fn needs_quotes(cell: &str) -> bool {
    cell.chars()
        .any(|c| c == DELIMITER || c == QUOTE || c.is_ascii_whitespace())
}

fn quote(cell: &str) -> String {
    if !needs_quotes(cell) {
        return cell.to_string();
    }
    let mut out = String::with_capacity(cell.len() + 2);
    out.push(QUOTE);
    for c in cell.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    out
}

/// The record as one terminated row.
pub fn row(record: &Record) -> String {
    let mut line = record
        .fields()
        .map(|(_, value)| quote(&cell_text(value)))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    line.push('\n');
    line
}

impl Writer for CsvWriter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, record: &Record) -> Result<()> {
        self.sink.append(&row(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BaseShape, ShopsShape};
    use crate::value::Value;

    #[test]
    fn test_quoting() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote(""), "");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_row() {
        let mut record = Record::new(&BaseShape);
        record.assign("name", Value::from("Shop")).unwrap();
        record.assign("price", Value::Int(12)).unwrap();
        record.assign("none", Value::Null).unwrap();
        record.assign("tags", Value::from(vec!["a", "b"])).unwrap();
        assert_eq!(row(&record), "Shop,12,,\"a\nb\"\n");
    }

    #[test]
    fn test_appends_rows_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shops.csv");
        let writer = CsvWriter::new(Sink::File(path.clone()));

        let mut record = Record::new(&ShopsShape);
        record.assign("name", Value::from(vec!["A"])).unwrap();
        writer.write(&record).unwrap();
        writer.write(&record).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A,,,\nA,,,\n");
    }
}
