//! Value command implementation.

use super::report_valuation;
use crate::{config::AppConfig, data, output::OutputFormat};
use anyhow::{Context, Result};
use marketflow_core::InputSource;
use marketflow_dcf::DcfModel;
use tracing::info;

/// Fetch one ticker from FMP and value it.
pub(crate) async fn value_ticker(
    config: &AppConfig,
    ticker: &str,
    with_sensitivity: bool,
    format: OutputFormat,
) -> Result<()> {
    let source = data::fmp_source(config)?;
    let inputs = source
        .fetch_inputs(ticker)
        .await
        .with_context(|| format!("fetching inputs for {ticker}"))?;

    let result = DcfModel::default()
        .value(&inputs)
        .with_context(|| format!("valuing {}", inputs.ticker))?;
    info!(
        ticker = %result.ticker,
        intrinsic = result.intrinsic_value,
        recommendation = %result.recommendation,
        "valuation complete"
    );

    report_valuation(&result, with_sensitivity, format)
}
