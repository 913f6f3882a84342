//! Filter registry and chain execution
//!
//! Filters are looked up by name from a fixed table. A chain is resolved in
//! full before it runs, so an unknown name is reported as a configuration
//! error before any value is touched.
//!
//! Three kinds of filter exist:
//! - mappers are applied through [`process`]: null stays null, lists are
//!   mapped element by element, scalars are mapped directly;
//! - reducers see the whole list (null still short-circuits);
//! - inspectors see the raw value, null included (`not_null`).

mod cardinality;
mod markup;
mod text;

use crate::error::{ImportError, Result};
use crate::value::Value;

/// Outcome of a single filter function. The message is wrapped into an
/// [`ImportError::Filter`] carrying the filter name.
pub type FilterResult = std::result::Result<Value, String>;

#[derive(Clone, Copy)]
enum FilterKind {
    Mapper(fn(Value) -> FilterResult),
    Reducer(fn(Vec<Value>) -> FilterResult),
    Inspector(fn(Value) -> FilterResult),
}

pub struct Filter {
    name: &'static str,
    kind: FilterKind,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("name", &self.name).finish()
    }
}

const fn mapper(name: &'static str, func: fn(Value) -> FilterResult) -> Filter {
    Filter {
        name,
        kind: FilterKind::Mapper(func),
    }
}

const fn reducer(name: &'static str, func: fn(Vec<Value>) -> FilterResult) -> Filter {
    Filter {
        name,
        kind: FilterKind::Reducer(func),
    }
}

static FILTERS: &[Filter] = &[
    // cardinality
    reducer("exists", cardinality::exists),
    Filter {
        name: "not_null",
        kind: FilterKind::Inspector(cardinality::not_null),
    },
    reducer("max_one", cardinality::max_one),
    reducer("first", cardinality::first),
    reducer("one", cardinality::one),
    reducer("implode_rightarrow", cardinality::implode_rightarrow),
    reducer("implode_semicolon", cardinality::implode_semicolon),
    // markup
    mapper("inner_text", markup::inner_text),
    mapper("html", markup::html),
    mapper("inner_html", markup::inner_html),
    mapper("remove_root", markup::remove_root),
    mapper("remove_class", markup::remove_class),
    mapper("remove_style", markup::remove_style),
    mapper("remove_h1s", markup::remove_h1s),
    mapper("remove_imgs", markup::remove_imgs),
    mapper("all_nbsp_to_space", markup::all_nbsp_to_space),
    mapper("remove_empty_p", markup::remove_empty_p),
    mapper("remove_unnecessary_br", markup::remove_unnecessary_br),
    mapper("change_div_to_p", markup::change_div_to_p),
    mapper("attrib_src", markup::attrib_src),
    mapper("attrib_content", markup::attrib_content),
    mapper("attrib_alt", markup::attrib_alt),
    mapper("attrib_href", markup::attrib_href),
    mapper("attrib_data_href", markup::attrib_data_href),
    mapper("attrib_title", markup::attrib_title),
    mapper("attrib_data_description", markup::attrib_data_description),
    // text
    mapper("floatval", text::floatval),
    mapper("nl2br", text::nl2br),
    mapper("dmy_date", text::dmy_date),
    mapper("ymd_date", text::ymd_date),
    mapper("url_path_and_query", text::url_path_and_query),
    mapper("url_remove_dot_dot", text::url_remove_dot_dot),
    mapper("dirname_one", text::dirname_one),
    mapper("basename", text::basename),
];

/// Look up a filter by its configuration name.
pub fn lookup(name: &str) -> Option<&'static Filter> {
    FILTERS.iter().find(|filter| filter.name == name)
}

/// All registered filter names, in registry order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FILTERS.iter().map(|filter| filter.name)
}

/// Apply `func` to a value: null stays null, lists are mapped element-wise
/// (order and length preserved, null elements stay null), scalars are mapped
/// directly.
pub fn process(value: Value, func: impl Fn(Value) -> FilterResult) -> FilterResult {
    match value {
        Value::Null => Ok(Value::Null),
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Null => Ok(Value::Null),
                item => func(item),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        scalar => func(scalar),
    }
}

impl Filter {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, value: Value) -> Result<Value> {
        let result = match self.kind {
            FilterKind::Mapper(func) => process(value, func),
            FilterKind::Reducer(func) => match value {
                Value::Null => Ok(Value::Null),
                Value::List(items) => func(items),
                other => Err(format!("expects a list, got {}", other.type_name())),
            },
            FilterKind::Inspector(func) => func(value),
        };
        result.map_err(|message| ImportError::filter(self.name, message))
    }
}

/// A fully resolved, ordered filter chain.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<&'static Filter>,
}

impl FilterChain {
    /// Resolve every name up front; the first unknown name fails the whole chain.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let filters = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                lookup(name).ok_or_else(|| ImportError::config(format!("no such filter: {}", name)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { filters })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Left-to-right composition: each filter receives the previous output.
    pub fn apply(&self, value: Value) -> Result<Value> {
        self.filters
            .iter()
            .try_fold(value, |value, filter| filter.apply(value))
    }
}

/// Borrow the element behind a node value, for filters that only make
/// sense on markup.
fn expect_node(value: &Value) -> std::result::Result<&crate::markup::Element, String> {
    match value {
        Value::Node(el) => Ok(el),
        other => Err(format!("expects a markup node, got {}", other.type_name())),
    }
}

/// Text view of a scalar for string-typed filters.
fn expect_text(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::List(_) => Err("expects a scalar, got list".to_string()),
        other => Ok(other.to_text()),
    }
}
