//! Name -> constructor tables for the configurable variants
//!
//! Every variant is built once per configuration, so a bad reader or writer
//! option fails before any input is read.

use crate::config::{Config, Settings};
use crate::error::{ImportError, Result};
use crate::reader::{DelimitedReader, MarkupReader, ReadRecord};
use crate::record::{BaseShape, GalleryShape, RecordShape, ShopsShape};
use crate::writer::{CsvWriter, JsonWriter, NopWriter, PhpWriter, PrintWriter, Sink, Writer};

pub const DEFAULT_WRITER: &str = "nop";
pub const DEFAULT_SHAPE: &str = "base";

pub type ReaderFactory = fn(&Config, &Settings) -> Result<Box<dyn ReadRecord>>;
pub type WriterFactory = fn(&Config, &Settings) -> Result<Box<dyn Writer>>;

static READERS: &[(&str, ReaderFactory)] = &[("csv", csv_reader), ("html", html_reader)];

static WRITERS: &[(&str, WriterFactory)] = &[
    ("nop", nop_writer),
    ("print", print_writer),
    ("csv", csv_writer),
    ("json", json_writer),
    ("php", php_writer),
];

static SHAPES: &[&dyn RecordShape] = &[&BaseShape, &GalleryShape, &ShopsShape];

fn csv_reader(config: &Config, _: &Settings) -> Result<Box<dyn ReadRecord>> {
    Ok(Box::new(DelimitedReader::new(config.separator()?)))
}

fn html_reader(config: &Config, settings: &Settings) -> Result<Box<dyn ReadRecord>> {
    Ok(Box::new(MarkupReader::new(config.main.as_deref(), settings.markup.clone())?))
}

fn nop_writer(_: &Config, _: &Settings) -> Result<Box<dyn Writer>> {
    Ok(Box::new(NopWriter))
}

fn print_writer(_: &Config, _: &Settings) -> Result<Box<dyn Writer>> {
    Ok(Box::new(PrintWriter))
}

fn csv_writer(config: &Config, _: &Settings) -> Result<Box<dyn Writer>> {
    let sink = Sink::from_config(config.csv_out_file.as_ref());
    Ok(Box::new(CsvWriter::new(sink)))
}

fn json_writer(config: &Config, settings: &Settings) -> Result<Box<dyn Writer>> {
    let sink = Sink::from_config(config.json_out_file.as_ref());
    Ok(Box::new(JsonWriter::new(sink, &settings.output)))
}

fn php_writer(config: &Config, _: &Settings) -> Result<Box<dyn Writer>> {
    let sink = Sink::from_config(config.php_out_file.as_ref());
    Ok(Box::new(PhpWriter::new(sink)))
}

fn unknown(kind: &str, name: &str, known: impl Iterator<Item = &'static str>) -> ImportError {
    ImportError::config(format!(
        "unknown {} '{}' (known: {})",
        kind,
        name,
        known.collect::<Vec<_>>().join(", ")
    ))
}

pub fn reader(name: &str) -> Result<ReaderFactory> {
    READERS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| unknown("reader", name, READERS.iter().map(|(n, _)| *n)))
}

pub fn writer(name: &str) -> Result<WriterFactory> {
    WRITERS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| unknown("writer", name, WRITERS.iter().map(|(n, _)| *n)))
}

pub fn shape(name: &str) -> Result<&'static dyn RecordShape> {
    SHAPES
        .iter()
        .copied()
        .find(|shape| shape.name() == name)
        .ok_or_else(|| unknown("result", name, SHAPES.iter().map(|s| s.name())))
}
