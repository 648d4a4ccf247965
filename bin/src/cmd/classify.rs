//! Classify command implementation.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use marketflow_dcf::{
    classify,
    recommendation::{AVOID_AT_OR_BELOW, BUY_AT_OR_ABOVE, SELL_BELOW, STRONG_BUY_AT_OR_ABOVE},
};
use serde_json::json;

/// Print the recommendation for an upside percentage.
pub(crate) fn classify_upside(upside: f64, format: OutputFormat) -> Result<()> {
    let recommendation = classify(Some(upside));

    match format {
        OutputFormat::Json => output::print_json(&json!({
            "upside": upside,
            "recommendation": recommendation,
        })),
        OutputFormat::Text => {
            println!("{} -> {recommendation}", output::upside(Some(upside)));
            println!();
            println!("Thresholds (upside %):");
            println!("  STRONG BUY  u >= {STRONG_BUY_AT_OR_ABOVE}");
            println!("  BUY         {BUY_AT_OR_ABOVE} <= u < {STRONG_BUY_AT_OR_ABOVE}");
            println!("  HOLD        {SELL_BELOW} <= u < {BUY_AT_OR_ABOVE}");
            println!("  SELL        {AVOID_AT_OR_BELOW} < u < {SELL_BELOW}");
            println!("  AVOID       u <= {AVOID_AT_OR_BELOW}, or undefined");
            Ok(())
        }
    }
}
