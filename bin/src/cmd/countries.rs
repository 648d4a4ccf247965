//! Countries command implementation.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use marketflow_dcf::country::{DEFAULT_COUNTRY, EQUITY_RISK_PREMIUMS, LONG_TERM_GROWTH};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CountryRow {
    country: &'static str,
    equity_risk_premium: Option<f64>,
    long_term_growth: Option<f64>,
}

fn find(table: &[(&str, f64)], country: &str) -> Option<f64> {
    table
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, pct)| pct / 100.0)
}

/// Every country in either table, premium table order first.
fn rows() -> Vec<CountryRow> {
    let mut rows: Vec<CountryRow> = EQUITY_RISK_PREMIUMS
        .iter()
        .map(|&(country, _)| CountryRow {
            country,
            equity_risk_premium: find(EQUITY_RISK_PREMIUMS, country),
            long_term_growth: find(LONG_TERM_GROWTH, country),
        })
        .collect();

    rows.extend(
        LONG_TERM_GROWTH
            .iter()
            .filter(|(country, _)| find(EQUITY_RISK_PREMIUMS, country).is_none())
            .map(|&(country, pct)| CountryRow {
                country,
                equity_risk_premium: None,
                long_term_growth: Some(pct / 100.0),
            }),
    );
    rows
}

/// Print the country risk premium and growth tables.
pub(crate) fn list_countries(format: OutputFormat) -> Result<()> {
    let rows = rows();
    if format == OutputFormat::Json {
        return output::print_json(&rows);
    }

    output::header("Country Assumptions");
    println!("{:<20} {:>14} {:>18}", "Country", "Equity premium", "Long-term growth");
    println!("{}", "─".repeat(54));

    let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v * 100.0));
    for row in &rows {
        println!(
            "{:<20} {:>14} {:>18}",
            row.country,
            cell(row.equity_risk_premium),
            cell(row.long_term_growth)
        );
    }
    println!();
    println!("Unknown countries use the {DEFAULT_COUNTRY} figures.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_cover_both_tables() {
        let rows = rows();
        let us = rows.iter().find(|r| r.country == DEFAULT_COUNTRY).unwrap();
        assert!(us.equity_risk_premium.is_some());
        assert!(us.long_term_growth.is_some());

        let emerging = rows.iter().find(|r| r.country == "Emerging").unwrap();
        assert!(emerging.equity_risk_premium.is_none());

        for (country, _) in LONG_TERM_GROWTH {
            assert!(rows.iter().any(|r| r.country == *country));
        }
    }
}
