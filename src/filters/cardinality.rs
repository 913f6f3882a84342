//! Reducers and validators working on the extracted list as a whole

use super::FilterResult;
use crate::value::Value;

/// 1 if the list has content, 0 otherwise.
pub fn exists(items: Vec<Value>) -> FilterResult {
    Ok(Value::Int(if items.is_empty() { 0 } else { 1 }))
}

/// Identity, except that null is rejected.
pub fn not_null(value: Value) -> FilterResult {
    if value.is_null() {
        return Err("field cannot be null".to_string());
    }
    Ok(value)
}

/// The single element, or null for an empty list.
pub fn max_one(items: Vec<Value>) -> FilterResult {
    if items.len() > 1 {
        return Err(format!(
            "list must have at most 1 element, found {}",
            items.len()
        ));
    }
    Ok(items.into_iter().next().unwrap_or(Value::Null))
}

pub fn first(items: Vec<Value>) -> FilterResult {
    items
        .into_iter()
        .next()
        .ok_or_else(|| "there are zero elements in the list".to_string())
}

/// The single element; any other length is an error.
pub fn one(items: Vec<Value>) -> FilterResult {
    if items.len() != 1 {
        return Err(format!(
            "there must be exactly one element in the list, found {}",
            items.len()
        ));
    }
    Ok(items.into_iter().next().unwrap_or(Value::Null))
}

/// `a→b→c`
pub fn implode_rightarrow(items: Vec<Value>) -> FilterResult {
    Ok(implode(&items, "→"))
}

/// `a;b;c`
pub fn implode_semicolon(items: Vec<Value>) -> FilterResult {
    Ok(implode(&items, ";"))
}

fn implode(items: &[Value], separator: &str) -> Value {
    Value::Text(
        items
            .iter()
            .map(Value::to_text)
            .collect::<Vec<_>>()
            .join(separator),
    )
}
