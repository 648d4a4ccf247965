//! Compute command implementation.
//!
//! Values inputs read from a JSON file, without touching the network.

use super::report_valuation;
use crate::{
    config::AppConfig,
    data::{self, InputsFile},
    output::{self, OutputFormat},
};
use anyhow::Result;
use marketflow_batch::BatchRunner;
use marketflow_core::StaticInputSource;
use marketflow_dcf::DcfModel;
use std::path::Path;

/// Value a single inputs object, or every entry of an inputs array.
pub(crate) async fn compute_inputs(
    config: &AppConfig,
    path: &Path,
    with_sensitivity: bool,
    format: OutputFormat,
) -> Result<()> {
    match data::load_inputs(path)? {
        InputsFile::One(inputs) => {
            let result = DcfModel::default().value(&inputs)?;
            report_valuation(&result, with_sensitivity, format)
        }
        many @ InputsFile::Many(_) => {
            let source = StaticInputSource::try_from_inputs(many.into_vec())?;
            let tickers = source.tickers();
            let report = BatchRunner::new(source, config.batch_config())
                .run(&tickers)
                .await;

            match format {
                OutputFormat::Json => output::print_json(&report.to_output()),
                OutputFormat::Text => {
                    output::header("DCF Valuations");
                    output::print_report(&report);
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INPUTS: &str = r#"{
        "ticker": "acme",
        "price": 40.0,
        "shares_outstanding": 1000000.0,
        "revenue": 50000000.0,
        "revenue_growth": 0.05,
        "ebitda_margin": 0.3,
        "ebit_margin": 0.2,
        "tax_rate": 0.21,
        "discount": {"wacc": 0.09},
        "terminal_growth": 0.025
    }"#;

    fn write_inputs(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_compute_single_and_array() {
        let config = AppConfig::default();

        let one = write_inputs(INPUTS);
        compute_inputs(&config, one.path(), true, OutputFormat::Json)
            .await
            .unwrap();

        let many = write_inputs(&format!("[{INPUTS}, {}]", INPUTS.replace("acme", "beta")));
        compute_inputs(&config, many.path(), false, OutputFormat::Text)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_compute_rejects_duplicate_tickers() {
        let file = write_inputs(&format!("[{INPUTS}, {}]", INPUTS.replace("acme", " ACME")));
        let err = compute_inputs(&AppConfig::default(), file.path(), false, OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("duplicate inputs for ticker ACME"), "{err:#}");
    }

    #[tokio::test]
    async fn test_compute_rejects_divergent_single_input() {
        let file = write_inputs(&INPUTS.replace("0.025", "0.09"));
        let err = compute_inputs(&AppConfig::default(), file.path(), false, OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().to_lowercase().contains("terminal"));
    }
}
