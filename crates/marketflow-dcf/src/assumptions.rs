//! Estimating DCF assumptions from historical statements.
//!
//! Statement series are passed newest first, the order financial data APIs
//! return them in. Every estimator falls back to a fixed default when the
//! history is too thin to say anything.

/// Revenue growth used when fewer than two positive revenues are available.
pub const DEFAULT_REVENUE_GROWTH: f64 = 0.05;
/// Capex / revenue used without usable history.
pub const DEFAULT_CAPEX_PCT: f64 = 0.05;
/// Operating cash flow / revenue used without usable history.
pub const DEFAULT_OCF_PCT: f64 = 0.15;
/// EBITDA margin used without usable history.
pub const DEFAULT_EBITDA_MARGIN: f64 = 0.15;
/// EBIT margin used without usable history.
pub const DEFAULT_EBIT_MARGIN: f64 = 0.10;
/// Tax rate used when pre-tax income is not positive.
pub const DEFAULT_TAX_RATE: f64 = 0.21;
/// Upper bound on the effective tax rate.
pub const MAX_TAX_RATE: f64 = 0.40;
/// Pre-tax cost of debt used when the company carries no debt.
pub const DEFAULT_COST_OF_DEBT: f64 = 0.06;
/// Bounds on the implied cost of debt.
pub const COST_OF_DEBT_BOUNDS: (f64, f64) = (0.03, 0.15);
/// Bounds applied to historical growth before projecting it forward.
pub const GROWTH_BOUNDS: (f64, f64) = (-0.10, 0.30);

/// Compound annual growth rate of a series ordered oldest to newest.
///
/// Returns `None` for fewer than two points or non-positive endpoints.
#[must_use]
pub fn cagr(values: &[f64]) -> Option<f64> {
    let (first, last) = (*values.first()?, *values.last()?);
    if values.len() < 2 || first <= 0.0 || last <= 0.0 {
        return None;
    }
    let years = (values.len() - 1) as f64;
    Some((last / first).powf(1.0 / years) - 1.0)
}

/// Revenue CAGR over the positive revenues of a newest-first series.
///
/// ```
/// use marketflow_dcf::assumptions::revenue_growth;
///
/// // newest first: 121 ← 110 ← 100
/// let g = revenue_growth(&[121.0, 110.0, 100.0]);
/// assert!((g - 0.10).abs() < 1e-12);
/// ```
#[must_use]
pub fn revenue_growth(revenues_newest_first: &[f64]) -> f64 {
    let oldest_first: Vec<f64> = revenues_newest_first
        .iter()
        .rev()
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();
    cagr(&oldest_first).unwrap_or(DEFAULT_REVENUE_GROWTH)
}

/// Clamp a historical growth rate to [`GROWTH_BOUNDS`].
#[must_use]
pub fn clamp_growth(growth: f64) -> f64 {
    growth.clamp(GROWTH_BOUNDS.0, GROWTH_BOUNDS.1)
}

/// Average of `numerator / revenue` over periods with positive revenue.
///
/// The two series are paired period by period and truncated to the shorter.
#[must_use]
pub fn average_ratio(numerators: &[f64], revenues: &[f64]) -> Option<f64> {
    let ratios: Vec<f64> = numerators
        .iter()
        .zip(revenues)
        .filter(|(n, r)| n.is_finite() && r.is_finite() && **r > 0.0)
        .map(|(n, r)| n / r)
        .collect();

    (!ratios.is_empty()).then(|| ratios.iter().sum::<f64>() / ratios.len() as f64)
}

/// Average capex / revenue. Capex is taken as an absolute value since
/// cash flow statements report it as an outflow.
#[must_use]
pub fn capex_intensity(capex: &[f64], revenues: &[f64]) -> f64 {
    let capex: Vec<f64> = capex.iter().map(|c| c.abs()).collect();
    average_ratio(&capex, revenues).unwrap_or(DEFAULT_CAPEX_PCT)
}

/// Average operating cash flow / revenue.
#[must_use]
pub fn operating_cash_flow_margin(operating_cash_flow: &[f64], revenues: &[f64]) -> f64 {
    average_ratio(operating_cash_flow, revenues).unwrap_or(DEFAULT_OCF_PCT)
}

/// Average EBITDA / revenue.
#[must_use]
pub fn ebitda_margin(ebitda: &[f64], revenues: &[f64]) -> f64 {
    average_ratio(ebitda, revenues).unwrap_or(DEFAULT_EBITDA_MARGIN)
}

/// Average operating income / revenue.
#[must_use]
pub fn ebit_margin(operating_income: &[f64], revenues: &[f64]) -> f64 {
    average_ratio(operating_income, revenues).unwrap_or(DEFAULT_EBIT_MARGIN)
}

/// Effective tax rate clamped to `[0, MAX_TAX_RATE]`.
#[must_use]
pub fn effective_tax_rate(income_tax_expense: f64, income_before_tax: f64) -> f64 {
    if !income_before_tax.is_finite() || income_before_tax <= 0.0 || !income_tax_expense.is_finite() {
        return DEFAULT_TAX_RATE;
    }
    (income_tax_expense / income_before_tax).clamp(0.0, MAX_TAX_RATE)
}

/// Pre-tax cost of debt implied by interest expense, clamped to
/// [`COST_OF_DEBT_BOUNDS`].
#[must_use]
pub fn implied_cost_of_debt(interest_expense: f64, total_debt: f64) -> f64 {
    if !total_debt.is_finite() || total_debt <= 0.0 || !interest_expense.is_finite() {
        return DEFAULT_COST_OF_DEBT;
    }
    (interest_expense.abs() / total_debt).clamp(COST_OF_DEBT_BOUNDS.0, COST_OF_DEBT_BOUNDS.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cagr() {
        assert_relative_eq!(cagr(&[100.0, 121.0]).unwrap(), 0.21, epsilon = 1e-12);
        assert_relative_eq!(cagr(&[100.0, 110.0, 121.0]).unwrap(), 0.10, epsilon = 1e-12);
        assert!(cagr(&[100.0]).is_none());
        assert!(cagr(&[]).is_none());
        assert!(cagr(&[0.0, 100.0]).is_none());
    }

    #[test]
    fn test_revenue_growth_filters_non_positive() {
        let g = revenue_growth(&[121.0, 0.0, 110.0, -5.0, 100.0]);
        assert_relative_eq!(g, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_revenue_growth_default() {
        assert_relative_eq!(revenue_growth(&[100.0]), DEFAULT_REVENUE_GROWTH);
        assert_relative_eq!(revenue_growth(&[]), DEFAULT_REVENUE_GROWTH);
    }

    #[test]
    fn test_clamp_growth() {
        assert_relative_eq!(clamp_growth(0.5), 0.30);
        assert_relative_eq!(clamp_growth(-0.4), -0.10);
        assert_relative_eq!(clamp_growth(0.12), 0.12);
    }

    #[test]
    fn test_capex_intensity() {
        let capex = [-10.0, -6.0];
        let revenue = [100.0, 60.0];
        assert_relative_eq!(capex_intensity(&capex, &revenue), 0.10, epsilon = 1e-12);
        assert_relative_eq!(capex_intensity(&[], &[]), DEFAULT_CAPEX_PCT);
    }

    #[test]
    fn test_average_ratio_skips_zero_revenue() {
        let ratio = average_ratio(&[30.0, 5.0, 20.0], &[100.0, 0.0, 100.0]).unwrap();
        assert_relative_eq!(ratio, 0.25, epsilon = 1e-12);
        assert!(average_ratio(&[1.0], &[0.0]).is_none());
    }

    #[test]
    fn test_margin_defaults() {
        assert_relative_eq!(ebitda_margin(&[], &[]), DEFAULT_EBITDA_MARGIN);
        assert_relative_eq!(ebit_margin(&[], &[]), DEFAULT_EBIT_MARGIN);
        assert_relative_eq!(operating_cash_flow_margin(&[], &[]), DEFAULT_OCF_PCT);
        assert_relative_eq!(operating_cash_flow_margin(&[25.0], &[100.0]), 0.25);
    }

    #[test]
    fn test_effective_tax_rate() {
        assert_relative_eq!(effective_tax_rate(21.0, 100.0), 0.21, epsilon = 1e-12);
        assert_relative_eq!(effective_tax_rate(60.0, 100.0), MAX_TAX_RATE);
        assert_relative_eq!(effective_tax_rate(-5.0, 100.0), 0.0);
        assert_relative_eq!(effective_tax_rate(10.0, 0.0), DEFAULT_TAX_RATE);
        assert_relative_eq!(effective_tax_rate(10.0, -50.0), DEFAULT_TAX_RATE);
    }

    #[test]
    fn test_implied_cost_of_debt() {
        assert_relative_eq!(implied_cost_of_debt(-5.0, 100.0), 0.05, epsilon = 1e-12);
        assert_relative_eq!(implied_cost_of_debt(1.0, 100.0), 0.03);
        assert_relative_eq!(implied_cost_of_debt(50.0, 100.0), 0.15);
        assert_relative_eq!(implied_cost_of_debt(5.0, 0.0), DEFAULT_COST_OF_DEBT);
    }
}
