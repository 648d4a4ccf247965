//! Batch command implementation.

use crate::{
    config::AppConfig,
    data,
    output::{self, OutputFormat},
};
use anyhow::{Context, Result};
use marketflow_batch::{BatchRunner, JsonDirStore, ResultStore};
use std::path::PathBuf;
use tracing::info;

/// Value every ticker against FMP and persist the outcome.
pub(crate) async fn run_batch(
    config: &AppConfig,
    tickers: Vec<String>,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let tickers = if tickers.is_empty() {
        config.tickers.clone()
    } else {
        tickers
    };
    let store = JsonDirStore::new(out.unwrap_or_else(|| config.store_path.clone()));

    let source = data::fmp_source(config)?;
    let report = BatchRunner::new(source, config.batch_config())
        .run(&tickers)
        .await;

    let written = store
        .save(&report)
        .with_context(|| format!("saving results under {}", store.root().display()))?;
    info!(written, errors = report.errors.len(), root = %store.root().display(), "batch saved");

    match format {
        OutputFormat::Json => output::print_json(&report.summary()),
        OutputFormat::Text => {
            output::header("Batch Valuation");
            output::print_report(&report);
            println!(
                "Wrote {written} tickers to {}",
                store.root().display()
            );
            Ok(())
        }
    }
}
