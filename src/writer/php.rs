//! PHP array literal sink
//!
//! The persisted form is what PHP's `var_export` emits for an array of
//! records, so PHP consumers can `include` the file directly:
//!
//! ```text
//! array (
//!   0 =>
//!   array (
//!     'name' => 'Summer',
//!     'images' =>
//!     array (
//!       0 => 'a.jpg',
//!     ),
//!   ),
//! )
//! ```
//!
//! Appending parses the existing literal back. The parser accepts the subset
//! the encoder produces plus `array()` and short-form `[...]` arrays.

use super::{read_existing, write_file, write_stdout, Sink, Writer};
use crate::error::{ImportError, Result};
use crate::record::Record;
use crate::value::Value;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(Key, Literal)>),
}

impl Literal {
    /// Append with the next free integer key, like `$array[] = ...`.
    fn push(entries: &mut Vec<(Key, Literal)>, value: Literal) {
        let next = entries
            .iter()
            .filter_map(|(key, _)| match key {
                Key::Int(n) => Some(*n + 1),
                Key::Str(_) => None,
            })
            .max()
            .unwrap_or(0)
            .max(0);
        entries.push((Key::Int(next), value));
    }
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Literal::Null,
            Value::Text(text) => Literal::Str(text.clone()),
            Value::Int(n) => Literal::Int(*n),
            Value::Float(f) => Literal::Float(*f),
            Value::Node(el) => Literal::Str(el.outer_html()),
            Value::List(items) => Literal::Array(
                items
                    .iter()
                    .zip(0..)
                    .map(|(item, index)| (Key::Int(index), Literal::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<&Record> for Literal {
    fn from(record: &Record) -> Self {
        Literal::Array(
            record
                .fields()
                .map(|(name, value)| (Key::Str(name.to_string()), Literal::from(value)))
                .collect(),
        )
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f == f64::INFINITY {
        "INF".to_string()
    } else if f == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{:?}", f)
    }
}

/// Serialize in `var_export` layout.
pub fn export(literal: &Literal) -> String {
    let mut out = String::new();
    export_into(&mut out, literal, 0);
    out
}

fn export_into(out: &mut String, literal: &Literal, depth: usize) {
    match literal {
        Literal::Null => out.push_str("NULL"),
        Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::Int(n) => {
            let _ = write!(out, "{}", n);
        }
        Literal::Float(f) => out.push_str(&format_float(*f)),
        Literal::Str(s) => out.push_str(&quote(s)),
        Literal::Array(entries) => {
            out.push_str("array (\n");
            for (key, value) in entries {
                let _ = write!(out, "{:width$}", "", width = depth * 2 + 2);
                match key {
                    Key::Int(n) => {
                        let _ = write!(out, "{}", n);
                    }
                    Key::Str(s) => out.push_str(&quote(s)),
                }
                out.push_str(" => ");
                if let Literal::Array(_) = value {
                    let _ = write!(out, "\n{:width$}", "", width = depth * 2 + 2);
                }
                export_into(out, value, depth + 1);
                out.push_str(",\n");
            }
            let _ = write!(out, "{:width$})", "", width = depth * 2);
        }
    }
}

/// Parse a literal produced by [`export`].
pub fn parse(text: &str) -> std::result::Result<Literal, String> {
    let mut parser = Parser {
        src: text.as_bytes(),
        pos: 0,
    };
    let literal = parser.value()?;
    parser.skip_ws();
    if parser.peek() == Some(b';') {
        parser.pos += 1;
        parser.skip_ws();
    }
    if parser.pos < parser.src.len() {
        return Err(format!("unexpected trailing content at offset {}", parser.pos));
    }
    Ok(literal)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, token: &str) -> std::result::Result<(), String> {
        self.skip_ws();
        if self.src[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(format!("expected '{}' at offset {}", token, self.pos))
        }
    }

    fn word(&mut self) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_') {
            self.pos += 1;
        }
        // only ASCII letters were consumed
        std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default()
    }

    fn value(&mut self) -> std::result::Result<Literal, String> {
        self.skip_ws();
        match self.peek() {
            None => Err("unexpected end of input".to_string()),
            Some(b'\'') => self.string().map(Literal::Str),
            Some(b'[') => {
                self.pos += 1;
                self.entries(b']').map(Literal::Array)
            }
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.number(),
            Some(_) => {
                let at = self.pos;
                let word = self.word().to_ascii_lowercase();
                match word.as_str() {
                    "null" => Ok(Literal::Null),
                    "true" => Ok(Literal::Bool(true)),
                    "false" => Ok(Literal::Bool(false)),
                    "nan" => Ok(Literal::Float(f64::NAN)),
                    "inf" => Ok(Literal::Float(f64::INFINITY)),
                    "array" => {
                        self.expect("(")?;
                        self.entries(b')').map(Literal::Array)
                    }
                    _ => Err(format!("unexpected token at offset {}", at)),
                }
            }
        }
    }

    /// Entries up to and including `close`. Keys are optional, as in PHP.
    fn entries(&mut self, close: u8) -> std::result::Result<Vec<(Key, Literal)>, String> {
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(entries);
            }
            let first = self.value()?;
            self.skip_ws();
            if self.src[self.pos..].starts_with(b"=>") {
                self.pos += 2;
                let key = match first {
                    Literal::Int(n) => Key::Int(n),
                    Literal::Str(s) => Key::Str(s),
                    other => return Err(format!("unsupported array key {:?}", other)),
                };
                let value = self.value()?;
                match entries.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            } else {
                Literal::push(&mut entries, first);
            }
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(format!("expected ',' at offset {}", self.pos)),
            }
        }
    }

    fn string(&mut self) -> std::result::Result<String, String> {
        let start = self.pos;
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(format!("unterminated string at offset {}", start)),
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') if matches!(self.src.get(self.pos + 1), Some(b'\\' | b'\'')) => {
                    bytes.push(self.src[self.pos + 1]);
                    self.pos += 2;
                }
                Some(b) => {
                    bytes.push(b);
                    self.pos += 1;
                }
            }
        }
        String::from_utf8(bytes).map_err(|_| format!("invalid UTF-8 in string at offset {}", start))
    }

    fn number(&mut self) -> std::result::Result<Literal, String> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        if self.word_follows("INF") {
            self.pos += 3;
            let negative = self.src[start] == b'-';
            return Ok(Literal::Float(if negative { f64::NEG_INFINITY } else { f64::INFINITY }));
        }
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' => is_float = true,
                b'-' | b'+' if matches!(self.src[self.pos - 1], b'e' | b'E') => {}
                _ => break,
            }
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| format!("invalid number at offset {}", start))?;
        let parsed = if is_float {
            text.parse::<f64>().map(Literal::Float).map_err(|_| ())
        } else {
            text.parse::<i64>().map(Literal::Int).map_err(|_| ())
        };
        parsed.map_err(|_| format!("invalid number {:?} at offset {}", text, start))
    }

    fn word_follows(&self, word: &str) -> bool {
        self.src[self.pos..]
            .get(..word.len())
            .is_some_and(|w| w.eq_ignore_ascii_case(word.as_bytes()))
    }
}

pub struct PhpWriter {
    sink: Sink,
}

impl PhpWriter {
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }

    fn append_to(&self, path: &Path, record: &Record) -> Result<()> {
        let mut entries = match read_existing(path) {
            None => Vec::new(),
            Some(text) => match parse(&text) {
                Ok(Literal::Array(entries)) => entries,
                Ok(_) => return Err(ImportError::sink_format(path, "expected an array literal")),
                Err(message) => return Err(ImportError::sink_format(path, message)),
            },
        };
        Literal::push(&mut entries, Literal::from(record));
        tracing::debug!(path = %path.display(), records = entries.len(), "appending PHP record");
        write_file(path, &export(&Literal::Array(entries)))
    }
}

impl Writer for PhpWriter {
    fn name(&self) -> &'static str {
        "php"
    }

    fn write(&self, record: &Record) -> Result<()> {
        match &self.sink {
            Sink::File(path) => self.append_to(path, record),
            Sink::Stdout => {
                let mut text = export(&Literal::from(record));
                text.push('\n');
                write_stdout(&text)
            }
        }
    }
}
