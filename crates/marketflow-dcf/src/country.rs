//! Country-level equity risk premiums and long-term growth estimates.
//!
//! Premiums follow Damodaran's country risk premium table (NYU Stern, 2024);
//! growth rates are long-run GDP growth estimates used as the terminal
//! growth proxy. Both tables are stored in percent and returned as decimals.

/// Country used when a lookup finds no match.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Equity risk premium by country, in percent.
pub const EQUITY_RISK_PREMIUMS: &[(&str, f64)] = &[
    ("United States", 4.46),
    ("Canada", 4.23),
    ("United Kingdom", 5.01),
    ("Germany", 4.23),
    ("France", 5.01),
    ("Japan", 5.14),
    ("China", 5.14),
    ("Taiwan", 5.01),
    ("Korea", 4.87),
    ("India", 7.08),
    ("Brazil", 7.47),
    ("Australia", 4.23),
    ("Singapore", 4.23),
    ("Hong Kong", 5.01),
    ("Netherlands", 4.23),
    ("Switzerland", 4.23),
    ("Sweden", 4.23),
    ("Norway", 4.23),
    ("Denmark", 4.23),
    ("Finland", 4.59),
    ("Ireland", 5.01),
    ("Israel", 6.30),
    ("Mexico", 6.69),
    ("South Africa", 8.13),
    ("Russia", 8.13),
    ("Turkey", 10.06),
    ("Argentina", 13.94),
    ("Indonesia", 6.69),
    ("Malaysia", 5.78),
    ("Thailand", 6.30),
    ("Philippines", 6.69),
    ("Vietnam", 8.13),
];

/// Long-term GDP growth by country or region, in percent.
pub const LONG_TERM_GROWTH: &[(&str, f64)] = &[
    ("United States", 2.5),
    ("Canada", 2.0),
    ("United Kingdom", 1.5),
    ("Germany", 1.5),
    ("France", 1.5),
    ("Japan", 1.0),
    ("China", 4.0),
    ("Taiwan", 2.5),
    ("Korea", 2.5),
    ("India", 5.0),
    ("Brazil", 2.5),
    ("Australia", 2.5),
    ("Singapore", 2.5),
    ("Hong Kong", 2.5),
    ("Netherlands", 1.5),
    ("Switzerland", 1.5),
    ("Sweden", 2.0),
    ("Norway", 2.0),
    ("Denmark", 2.0),
    ("Finland", 1.5),
    ("Ireland", 2.5),
    ("Israel", 3.0),
    ("Mexico", 2.5),
    ("Indonesia", 4.5),
    ("Malaysia", 4.0),
    ("Thailand", 3.5),
    ("Philippines", 5.0),
    ("Vietnam", 5.5),
    ("Developed", 2.0),
    ("Emerging", 4.5),
];

fn lookup(table: &[(&str, f64)], country: &str) -> f64 {
    let country = country.trim();
    table
        .iter()
        .find(|(name, _)| *name == country)
        .or_else(|| table.iter().find(|(name, _)| name.eq_ignore_ascii_case(country)))
        .or_else(|| table.iter().find(|(name, _)| *name == DEFAULT_COUNTRY))
        .map_or(f64::NAN, |(_, pct)| pct / 100.0)
}

/// Equity risk premium for a country, as a decimal.
///
/// Unknown countries fall back to the United States.
///
/// ```
/// use marketflow_dcf::country::equity_risk_premium;
///
/// assert!((equity_risk_premium("taiwan") - 0.0501).abs() < 1e-12);
/// assert!((equity_risk_premium("Atlantis") - 0.0446).abs() < 1e-12);
/// ```
#[must_use]
pub fn equity_risk_premium(country: &str) -> f64 {
    lookup(EQUITY_RISK_PREMIUMS, country)
}

/// Long-term growth estimate for a country, as a decimal.
///
/// Unknown countries fall back to the United States.
#[must_use]
pub fn long_term_growth(country: &str) -> f64 {
    lookup(LONG_TERM_GROWTH, country)
}
