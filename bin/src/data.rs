//! Input loading utilities for the marketflow CLI.

use anyhow::{Context, Result, bail};
use marketflow_core::ValuationInputs;
use marketflow_fmp::FmpInputSource;
use serde_json::Value;
use std::path::Path;

use crate::config::AppConfig;

/// Contents of an inputs file: one object or an array of them.
///
/// Tickers are trimmed and upper-cased on parse.
#[derive(Debug)]
pub(crate) enum InputsFile {
    Many(Vec<ValuationInputs>),
    One(Box<ValuationInputs>),
}

impl InputsFile {
    /// All inputs.
    pub(crate) fn into_vec(self) -> Vec<ValuationInputs> {
        match self {
            Self::Many(all) => all,
            Self::One(one) => vec![*one],
        }
    }
}

fn normalized(mut inputs: ValuationInputs) -> ValuationInputs {
    inputs.ticker = inputs.ticker.trim().to_uppercase();
    inputs
}

/// Parse valuation inputs from JSON text.
///
/// The shape is chosen from the top-level JSON value so field errors are
/// reported against the object (or array entry) they belong to.
pub(crate) fn parse_inputs(json: &str) -> Result<InputsFile> {
    let value: Value = serde_json::from_str(json).context("inputs file is not valid JSON")?;

    match value {
        Value::Array(entries) => {
            if entries.is_empty() {
                bail!("inputs file contains an empty array");
            }
            let all = entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    serde_json::from_value(entry)
                        .map(normalized)
                        .with_context(|| format!("invalid valuation inputs at index {i}"))
                })
                .collect::<Result<Vec<ValuationInputs>>>()?;
            Ok(InputsFile::Many(all))
        }
        Value::Object(_) => {
            let one = serde_json::from_value(value).context("invalid valuation inputs object")?;
            Ok(InputsFile::One(Box::new(normalized(one))))
        }
        other => bail!("expected a valuation inputs object or array, got {}", kind(&other)),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load valuation inputs from a JSON file.
pub(crate) fn load_inputs(path: &Path) -> Result<InputsFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading inputs {}", path.display()))?;
    parse_inputs(&json)
}

/// FMP-backed input source using the configured assumptions.
pub(crate) fn fmp_source(config: &AppConfig) -> Result<FmpInputSource> {
    FmpInputSource::from_env(config.source_config()).context("creating FMP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: &str = r#"{
        "ticker": "acme",
        "price": 40.0,
        "shares_outstanding": 1000000.0,
        "revenue": 50000000.0,
        "revenue_growth": [0.10, 0.08, 0.06, 0.05, 0.04],
        "ebitda_margin": 0.3,
        "ebit_margin": 0.2,
        "tax_rate": 0.21,
        "discount": {"wacc": 0.09},
        "terminal_growth": 0.025
    }"#;

    #[test]
    fn test_parse_single_object() {
        let inputs = parse_inputs(ONE).unwrap().into_vec();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].ticker, "ACME");
        assert_eq!(inputs[0].horizon, 5);
        assert_eq!(inputs[0].revenue_growth.len_hint(), Some(5));
    }

    #[test]
    fn test_parse_array() {
        let json = format!("[{ONE}, {ONE}]");
        assert_eq!(parse_inputs(&json).unwrap().into_vec().len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(parse_inputs("[]").is_err());
        assert!(parse_inputs("{\"ticker\": 3}").is_err());
        assert!(parse_inputs("42").is_err());
    }

    #[test]
    fn test_single_object_is_normalized() {
        let InputsFile::One(inputs) = parse_inputs(ONE).unwrap() else {
            panic!("expected a single inputs object");
        };
        assert_eq!(inputs.ticker, "ACME");
    }

    #[test]
    fn test_field_errors_are_specific() {
        let missing_price = ONE.replace("\"price\": 40.0,", "");

        let err = parse_inputs(&missing_price).unwrap_err();
        assert!(format!("{err:#}").contains("price"), "{err:#}");

        let err = parse_inputs(&format!("[{ONE}, {missing_price}]")).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("index 1"), "{message}");
        assert!(message.contains("price"), "{message}");
        assert!(!message.contains("did not match any variant"), "{message}");
    }
}
