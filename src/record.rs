//! Import records and their shape validation
//!
//! A [`Record`] is filled field by field by a reader, validated once by its
//! [`RecordShape`], then handed to exactly one writer.

use crate::error::{ImportError, Result};
use crate::value::Value;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// Domain invariants of a record.
pub trait RecordShape: Sync {
    /// Name used in the `result` configuration key.
    fn name(&self) -> &'static str;

    /// Fields present before the reader runs.
    fn defaults(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    fn validate(&self, _record: &Record) -> Result<()> {
        Ok(())
    }
}

/// Fail with a validation error carrying `message` when `condition` is false.
pub fn check(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ImportError::Validation(message.to_string()))
    }
}

pub struct Record {
    shape: &'static dyn RecordShape,
    fields: IndexMap<String, Value>,
    assigned: HashSet<String>,
}

impl Record {
    pub fn new(shape: &'static dyn RecordShape) -> Self {
        let fields = shape
            .defaults()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self {
            shape,
            fields,
            assigned: HashSet::new(),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape.name()
    }

    /// Set a field. Each field may be assigned once; defaults do not count.
    pub fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        if !self.assigned.insert(field.to_string()) {
            return Err(ImportError::config(format!(
                "field '{}' assigned twice in one import",
                field
            )));
        }
        self.fields.insert(field.to_string(), value);
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Fields in insertion order: shape defaults first, then configuration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        self.shape.validate(self)
    }

    fn list_len(&self, field: &str) -> Option<usize> {
        self.get(field).and_then(Value::as_list).map(<[Value]>::len)
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("shape", &self.shape.name())
            .field("fields", &self.fields)
            .finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// No invariants.
pub struct BaseShape;

impl RecordShape for BaseShape {
    fn name(&self) -> &'static str {
        "base"
    }
}

/// Image gallery: a name, images and one caption per image.
pub struct GalleryShape;

impl RecordShape for GalleryShape {
    fn name(&self) -> &'static str {
        "gallery"
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(String::new())),
            ("images", Value::List(Vec::new())),
            ("captions", Value::List(Vec::new())),
        ]
    }

    fn validate(&self, record: &Record) -> Result<()> {
        let name = record.get("name").and_then(Value::as_text).unwrap_or_default();
        check(!name.is_empty(), "Gallery name cannot be empty")?;
        let images = record.list_len("images");
        check(images.is_some_and(|n| n > 0), "Gallery cannot be empty")?;
        let captions = record.list_len("captions");
        check(captions.is_some(), "Image captions must be a list")?;
        check(
            images == captions,
            "Equal number of images and captions required",
        )
    }
}

/// Shop list: parallel lists of names, addresses and GPS coordinates.
pub struct ShopsShape;

const SHOP_FIELDS: [&str; 4] = ["name", "address", "gps_lat", "gps_lon"];

impl RecordShape for ShopsShape {
    fn name(&self) -> &'static str {
        "shops"
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        SHOP_FIELDS
            .iter()
            .map(|field| (*field, Value::List(Vec::new())))
            .collect()
    }

    fn validate(&self, record: &Record) -> Result<()> {
        for field in SHOP_FIELDS {
            check(
                record.list_len(field).is_some(),
                &format!("Shop {}: must be a list", field),
            )?;
        }
        let names = record.list_len("name");
        check(
            names == record.list_len("address"),
            "Equal number of shop names and addresses required",
        )?;
        check(
            names == record.list_len("gps_lat") && names == record.list_len("gps_lon"),
            "Equal number of shop names and GPS coordinates required",
        )
    }
}
