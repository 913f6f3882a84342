//! JSON array sink
//!
//! With a sink file, each record is appended as one object to the array the
//! file holds (a missing file starts a new array). Without one, the record is
//! printed to stdout as a single object.

use super::{read_existing, write_file, write_stdout, Sink, Writer};
use crate::config::OutputOptions;
use crate::error::{ImportError, Result};
use crate::record::Record;
use serde_json::Value as Json;
use std::path::Path;

pub struct JsonWriter {
    sink: Sink,
    pretty: bool,
}

impl JsonWriter {
    pub fn new(sink: Sink, options: &OutputOptions) -> Self {
        Self {
            sink,
            pretty: options.pretty_json,
        }
    }

    fn encode(&self, json: &Json) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(json)
        } else {
            serde_json::to_string(json)
        }
    }

    fn append_to(&self, path: &Path, record: &Record) -> Result<()> {
        let mut objects = match read_existing(path) {
            None => Vec::new(),
            Some(text) => match serde_json::from_str::<Json>(&text) {
                Ok(Json::Array(objects)) => objects,
                Ok(other) => {
                    return Err(ImportError::sink_format(
                        path,
                        format!("expected a JSON array, found {}", json_type(&other)),
                    ))
                }
                Err(e) => return Err(ImportError::sink_format(path, e.to_string())),
            },
        };

        let object = serde_json::to_value(record)
            .map_err(|e| ImportError::sink_format(path, e.to_string()))?;
        objects.push(object);
        tracing::debug!(path = %path.display(), records = objects.len(), "appending JSON record");

        let text = self
            .encode(&Json::Array(objects))
            .map_err(|e| ImportError::sink_format(path, e.to_string()))?;
        write_file(path, &text)
    }
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

impl Writer for JsonWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, record: &Record) -> Result<()> {
        match &self.sink {
            Sink::File(path) => self.append_to(path, record),
            Sink::Stdout => {
                let json = serde_json::to_value(record)
                    .map_err(|e| ImportError::sink_format("<stdout>", e.to_string()))?;
                let mut text = self
                    .encode(&json)
                    .map_err(|e| ImportError::sink_format("<stdout>", e.to_string()))?;
                text.push('\n');
                write_stdout(&text)
            }
        }
    }
}
