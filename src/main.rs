use clap::Parser;
use scrape_import::{logging, Importer, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

/// Import fields from HTML or delimited text files as configured.
#[derive(Debug, Parser)]
#[command(name = "scrape-import", version)]
struct Cli {
    /// JSON import configuration
    config: PathBuf,

    /// Files to import, processed in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = Importer::from_config_file(&cli.config, Settings::default())
        .and_then(|importer| importer.import_all(&cli.inputs));
    match result {
        Ok(records) => {
            tracing::debug!(imported = records.len(), "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), "{}", err);
            ExitCode::FAILURE
        }
    }
}
