//! Import orchestration
//!
//! [`Importer::new`] resolves every name in the configuration and builds the
//! reader and writer before any input is touched. Each call to
//! [`Importer::import`] then runs one file through
//! read -> extract + filter per field -> validate -> write.

use crate::config::{Config, Settings};
use crate::error::{ImportError, Result};
use crate::reader::{FieldPlan, ReadRecord};
use crate::record::{Record, RecordShape};
use crate::registry;
use crate::writer::Writer;
use std::path::{Path, PathBuf};

pub struct Importer {
    config: Config,
    reader: Box<dyn ReadRecord>,
    writer: Box<dyn Writer>,
    shape: &'static dyn RecordShape,
    fields: Vec<FieldPlan>,
}

impl Importer {
    pub fn new(config: Config, settings: Settings) -> Result<Self> {
        let reader = registry::reader(&config.reader)?(&config, &settings)?;
        let writer_name = config.writer.as_deref().unwrap_or(registry::DEFAULT_WRITER);
        let writer = registry::writer(writer_name)?(&config, &settings)?;
        let shape = registry::shape(config.result.as_deref().unwrap_or(registry::DEFAULT_SHAPE))?;
        let fields = FieldPlan::resolve_all(&config.imports)?;

        tracing::debug!(
            reader = %config.reader,
            writer = writer.name(),
            result = shape.name(),
            fields = fields.len(),
            "import configured"
        );
        Ok(Self {
            config,
            reader,
            writer,
            shape,
            fields,
        })
    }

    /// Load the configuration file and resolve it.
    pub fn from_config_file(path: &Path, settings: Settings) -> Result<Self> {
        Self::new(Config::from_file(path)?, settings)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import one file. The record reaches the writer only if it validates.
    pub fn import(&self, input: &Path) -> Result<Record> {
        tracing::info!(input = %input.display(), "importing");
        let raw = std::fs::read(input).map_err(|e| ImportError::io(input, e))?;
        tracing::debug!(input = %input.display(), bytes = raw.len(), "read input");

        let mut record = Record::new(self.shape);
        self.reader.read(input, &raw, &self.fields, &mut record)?;
        record.validate()?;
        self.writer.write(&record)?;

        tracing::info!(
            input = %input.display(),
            fields = record.len(),
            writer = self.writer.name(),
            "imported"
        );
        Ok(record)
    }

    /// Import files one after another. The first failure stops the run.
    pub fn import_all<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<Record>> {
        inputs.iter().map(|input| self.import(input.as_ref())).collect()
    }
}

/// Convenience for one-off runs: resolve `config_path` and import `inputs`.
pub fn run(config_path: &Path, inputs: &[PathBuf], settings: Settings) -> Result<Vec<Record>> {
    Importer::from_config_file(config_path, settings)?.import_all(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn importer(json: &str) -> Result<Importer> {
        Importer::new(Config::from_json(json)?, Settings::default())
    }

    fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run_with(json: &str, input: &Path) -> Result<Record> {
        importer(json)?.import(input)
    }

    #[test]
    fn test_csv_import() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "shops.csv", "A;1 St;47.1;19.1\nB;2 St;47.2;19.2\n");
        let importer = importer(
            r#"{"reader": "csv", "result": "shops", "imports": {
                "name": ["0"], "address": ["1"],
                "gps_lat": ["2", "floatval"], "gps_lon": ["3", "floatval"]}}"#,
        )
        .unwrap();

        let record = importer.import(&input).unwrap();
        assert_eq!(record.shape_name(), "shops");
        assert_eq!(
            record.get("gps_lat"),
            Some(&crate::value::Value::from(vec![47.1, 47.2]))
        );
    }

    #[test]
    fn test_unknown_names_fail_before_reading() {
        for json in [
            r#"{"reader": "xml", "imports": {}}"#,
            r#"{"reader": "csv", "writer": "yaml", "imports": {}}"#,
            r#"{"reader": "csv", "result": "blog", "imports": {}}"#,
            r#"{"reader": "csv", "imports": {"a": ["0"], "b": ["1", "first", "bogus"]}}"#,
        ] {
            let err = importer(json).err().unwrap();
            assert_eq!(err.kind(), "configuration", "{}", json);
        }
    }

    #[test]
    fn test_bad_reader_options_fail_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        for (json, kind) in [
            (r#"{"reader": "csv", "csvseparator": ";;", "imports": {}}"#, "configuration"),
            (r#"{"reader": "html", "main": "div[[", "imports": {}}"#, "extraction"),
        ] {
            let err = importer(json).err().unwrap();
            assert_eq!(err.kind(), kind, "{}", json);
            let err = run_with(json, &missing).unwrap_err();
            assert_eq!(err.kind(), kind, "{}", json);
        }
    }

    #[test]
    fn test_validation_failure_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("out.json");
        let input = write_input(&dir, "gallery.html", "<h1>No images here</h1>");
        let json = format!(
            r#"{{"reader": "html", "writer": "json", "result": "gallery",
                "jsonoutfile": {:?},
                "imports": {{"name": ["h1", "one", "inner_text"], "images": ["img", "attrib_src"]}}}}"#,
            sink.display().to_string()
        );
        let err = importer(&json).unwrap().import(&input).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(!sink.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let importer = importer(r#"{"reader": "csv", "imports": {}}"#).unwrap();
        let err = importer.import(&dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_import_all_stops_at_first_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("rows.csv");
        let good = write_input(&dir, "a.csv", "x;1\n");
        let bad = write_input(&dir, "b.csv", "y;1\nz;2\n");
        let json = format!(
            r#"{{"reader": "csv", "writer": "csv", "csvoutfile": {:?},
                "imports": {{"name": ["0", "one"]}}}}"#,
            sink.display().to_string()
        );
        let importer = importer(&json).unwrap();

        let err = importer.import_all(&[&good, &bad, &good]).unwrap_err();
        assert_eq!(err.kind(), "filter");
        assert_eq!(fs::read_to_string(&sink).unwrap(), "x\n");
    }
}
