use super::Writer;
use crate::error::Result;
use crate::record::Record;

/// Discards the record. Used when no writer is configured.
pub struct NopWriter;

impl Writer for NopWriter {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn write(&self, record: &Record) -> Result<()> {
        tracing::debug!(fields = record.len(), "record discarded");
        Ok(())
    }
}
