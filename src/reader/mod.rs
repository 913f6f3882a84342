//! Readers turn raw input bytes into a queryable document and extract field
//! values from it by path.
//!
//! Every variant implements the two-step [`Reader`] contract. The pipeline
//! drives readers through [`ReadRecord`], which is object safe and is
//! implemented for every [`Reader`].

pub mod delimited;
pub mod markup;

pub use delimited::DelimitedReader;
pub use markup::MarkupReader;

use crate::config::FieldMap;
use crate::error::Result;
use crate::filters::FilterChain;
use crate::record::Record;
use crate::value::Value;
use std::path::Path;

pub trait Reader {
    type Document;

    /// `source` names the input the bytes were read from.
    fn parse(&self, raw: &[u8], source: &Path) -> Result<Self::Document>;

    /// Values found at `path`. Always a list, possibly empty.
    fn extract(&self, document: &Self::Document, path: &str) -> Result<Vec<Value>>;
}

/// A configured field with its filter chain already resolved.
#[derive(Debug, Clone)]
pub struct FieldPlan {
    pub name: String,
    pub path: String,
    pub chain: FilterChain,
}

impl FieldPlan {
    /// Resolve every field's chain. Fails on the first unknown filter name.
    pub fn resolve_all(imports: &FieldMap) -> Result<Vec<FieldPlan>> {
        imports
            .iter()
            .map(|(name, spec)| {
                Ok(FieldPlan {
                    name: name.clone(),
                    path: spec.path.clone(),
                    chain: FilterChain::resolve(&spec.filters)?,
                })
            })
            .collect()
    }
}

pub trait ReadRecord {
    /// Parse `raw` once, then extract, filter and assign every field in order.
    fn read(
        &self,
        source: &Path,
        raw: &[u8],
        fields: &[FieldPlan],
        record: &mut Record,
    ) -> Result<()>;
}

impl<R: Reader> ReadRecord for R {
    fn read(
        &self,
        source: &Path,
        raw: &[u8],
        fields: &[FieldPlan],
        record: &mut Record,
    ) -> Result<()> {
        let document = self.parse(raw, source)?;
        for field in fields {
            let found = self.extract(&document, &field.path)?;
            tracing::debug!(
                field = %field.name,
                path = %field.path,
                matches = found.len(),
                filters = field.chain.len(),
                "extracted field"
            );
            let value = field.chain.apply(Value::List(found))?;
            record.assign(&field.name, value)?;
        }
        Ok(())
    }
}

/// Input bytes as text. Invalid UTF-8 sequences are replaced.
pub(crate) fn decode(raw: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(raw)
}
