//! The datum flowing through extraction and filter chains

use crate::markup::Element;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::sync::Arc;

/// A field value.
///
/// Extraction always produces a flat `List`; filters may collapse it to a
/// scalar or `Null`. Lists never contain lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    /// A copy of a matched markup element
    Node(Arc<Element>),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Node(_) => "node",
            Value::List(_) => "list",
        }
    }

    /// String form used where a filter or sink needs plain text.
    /// Nodes yield their text content, lists their elements joined by newlines.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(text) => text.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Node(el) => el.text(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Element> for Value {
    fn from(el: Element) -> Self {
        Value::Node(Arc::new(el))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Nodes serialize as their outer markup.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Node(el) => serializer.serialize_str(&el.outer_html()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::from(7i64).to_text(), "7");
        assert_eq!(Value::from(123.0).to_text(), "123");
        assert_eq!(Value::from(1.5).to_text(), "1.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_text(), "a\nb");

        let el = Element::new("p").with_child("Hello");
        assert_eq!(Value::from(el).to_text(), "Hello");
    }

    #[test]
    fn test_float_text_has_no_exponent() {
        assert_eq!(Value::Float(1e21).to_text(), "1000000000000000000000");
        assert_eq!(Value::Float(2.0).to_text(), "2");
        assert_eq!(Value::Float(0.25).to_text(), "0.25");
    }

    #[test]
    fn test_json_serialization() {
        let value = Value::List(vec![
            Value::from("a"),
            Value::Null,
            Value::from(2i64),
            Value::from(Element::new("b").with_child("bold")),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["a",null,2,"<b>bold</b>"]"#);
    }
}
