//! CLI subcommand modules.
//!
//! One module per `marketflow` subcommand.

pub(crate) mod batch;
pub(crate) mod classify;
pub(crate) mod compute;
pub(crate) mod countries;
pub(crate) mod params;
pub(crate) mod value;

use crate::output::{self, OutputFormat};
use anyhow::Result;
use marketflow_core::{ValuationRecord, ValuationResult};
use marketflow_dcf::{SensitivityConfig, SensitivityMatrix, sensitivity};
use serde::Serialize;

/// JSON shape printed for a single valuation.
#[derive(Serialize)]
struct ValuationOutput<'a> {
    record: ValuationRecord,
    valuation: &'a ValuationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivity: Option<SensitivityMatrix>,
}

/// Print one valuation, with its sensitivity grid when requested.
fn report_valuation(result: &ValuationResult, with_sensitivity: bool, format: OutputFormat) -> Result<()> {
    let matrix = if with_sensitivity {
        Some(sensitivity(result, &SensitivityConfig::default())?)
    } else {
        None
    };

    match format {
        OutputFormat::Json => output::print_json(&ValuationOutput {
            record: result.to_record(),
            valuation: result,
            sensitivity: matrix,
        }),
        OutputFormat::Text => {
            output::header("DCF Valuation");
            output::print_valuation(result)?;
            if let Some(ref matrix) = matrix {
                output::print_sensitivity(matrix);
            }
            Ok(())
        }
    }
}
