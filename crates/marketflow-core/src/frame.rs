//! Tabular views of valuation output.
//!
//! Projection rows and batch records are naturally tables; these helpers
//! turn them into Polars `DataFrame`s for display and export.

use crate::{ProjectionRow, Result, ValuationRecord};
use polars::prelude::*;

/// Build a `DataFrame` with one row per forecast year.
///
/// Columns: `year`, `revenue`, `ebitda`, `ebit`, `depreciation`, `capex`,
/// `wc_change`, `ufcf`, `discount_factor`, `present_value`.
pub fn projection_frame(rows: &[ProjectionRow]) -> Result<DataFrame> {
    let column = |f: fn(&ProjectionRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();

    let df = df! {
        "year" => rows.iter().map(|r| r.year as i32).collect::<Vec<i32>>(),
        "revenue" => column(|r| r.revenue),
        "ebitda" => column(|r| r.ebitda),
        "ebit" => column(|r| r.ebit),
        "depreciation" => column(|r| r.depreciation),
        "capex" => column(|r| r.capex),
        "wc_change" => column(|r| r.working_capital_change),
        "ufcf" => column(|r| r.ufcf),
        "discount_factor" => column(|r| r.discount_factor),
        "present_value" => column(|r| r.present_value),
    }?;

    Ok(df)
}

/// Build a `DataFrame` with one row per valuation record.
///
/// `upside` is nullable; the recommendation is stored as its label.
pub fn records_frame(records: &[ValuationRecord]) -> Result<DataFrame> {
    let df = df! {
        "ticker" => records.iter().map(|r| r.ticker.as_str()).collect::<Vec<&str>>(),
        "price" => records.iter().map(|r| r.price).collect::<Vec<f64>>(),
        "intrinsic" => records.iter().map(|r| r.intrinsic).collect::<Vec<f64>>(),
        "upside" => records.iter().map(|r| r.upside).collect::<Vec<Option<f64>>>(),
        "recommendation" => records.iter().map(|r| r.recommendation.as_str()).collect::<Vec<&str>>(),
        "wacc" => records.iter().map(|r| r.wacc).collect::<Vec<f64>>(),
        "rev_growth" => records.iter().map(|r| r.rev_growth).collect::<Vec<f64>>(),
    }?;

    Ok(df)
}
