//! Human-readable dump to stdout, for trying out configurations

use super::{write_stdout, Writer};
use crate::error::Result;
use crate::record::Record;
use crate::value::Value;
use std::fmt::Write as _;

pub struct PrintWriter;

const INDENT: usize = 4;

/// Render a record as an indented block:
///
/// ```text
/// gallery (
///     [name] => Summer
///     [images] => List (
///         [0] => a.jpg
///     )
/// )
/// ```
pub fn render(record: &Record) -> String {
    let mut out = format!("{} (\n", record.shape_name());
    for (name, value) in record.fields() {
        render_entry(&mut out, name, value, INDENT);
    }
    out.push_str(")\n");
    out
}

fn render_entry(out: &mut String, key: &str, value: &Value, depth: usize) {
    let _ = write!(out, "{:depth$}[{}] => ", "", key, depth = depth);
    match value {
        Value::List(items) => {
            out.push_str("List (\n");
            for (index, item) in items.iter().enumerate() {
                render_entry(out, &index.to_string(), item, depth + INDENT);
            }
            let _ = writeln!(out, "{:depth$})", "", depth = depth);
        }
        Value::Null => out.push_str("null\n"),
        Value::Node(el) => {
            out.push_str(&el.outer_html());
            out.push('\n');
        }
        scalar => {
            out.push_str(&scalar.to_text());
            out.push('\n');
        }
    }
}

impl Writer for PrintWriter {
    fn name(&self) -> &'static str {
        "print"
    }

    fn write(&self, record: &Record) -> Result<()> {
        write_stdout(&render(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BaseShape, GalleryShape};

    #[test]
    fn test_render_nested() {
        let mut record = Record::new(&GalleryShape);
        record.assign("name", Value::from("Summer")).unwrap();
        record
            .assign("images", Value::from(vec!["a.jpg", "b.jpg"]))
            .unwrap();
        assert_eq!(
            render(&record),
            "gallery (\n    [name] => Summer\n    [images] => List (\n        [0] => a.jpg\n        [1] => b.jpg\n    )\n    [captions] => List (\n    )\n)\n"
        );
    }

    #[test]
    fn test_render_scalars() {
        let mut record = Record::new(&BaseShape);
        record.assign("missing", Value::Null).unwrap();
        record.assign("price", Value::Float(9.5)).unwrap();
        assert_eq!(
            render(&record),
            "base (\n    [missing] => null\n    [price] => 9.5\n)\n"
        );
    }
}
