//! Discounting and Gordon-growth terminal value.

use crate::projection::ProjectedYear;
use marketflow_core::{ProjectionRow, Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Terminal value at the end of the forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalValue {
    /// `ufcf(N) × (1 + g) / (wacc − g)`.
    pub value: f64,
    /// `value × discount_factor(N)`.
    pub present_value: f64,
}

/// Check that a discount rate and perpetual growth rate can be used
/// together.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidInput`] for non-finite rates or a WACC
/// of −100 % or less, and [`ValuationError::DivergentTerminalValue`] when
/// `wacc <= terminal_growth`.
pub fn validate_rates(wacc: f64, terminal_growth: f64) -> Result<()> {
    if !wacc.is_finite() || wacc <= -1.0 {
        return Err(ValuationError::invalid(format!(
            "discount rate must be finite and greater than -100%, got {wacc}"
        )));
    }
    if !terminal_growth.is_finite() {
        return Err(ValuationError::invalid(format!(
            "terminal growth must be finite, got {terminal_growth}"
        )));
    }
    if wacc <= terminal_growth {
        return Err(ValuationError::DivergentTerminalValue {
            wacc,
            terminal_growth,
        });
    }
    Ok(())
}

/// `1 / (1 + wacc)^year`.
#[must_use]
pub fn discount_factor(wacc: f64, year: u32) -> f64 {
    let base = 1.0 + wacc;
    let growth = i32::try_from(year).map_or_else(|_| base.powf(f64::from(year)), |n| base.powi(n));
    1.0 / growth
}

/// Discount each projected year at `wacc`.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidInput`] when `wacc` is non-finite or
/// ≤ −100 %.
pub fn discount(years: &[ProjectedYear], wacc: f64) -> Result<Vec<ProjectionRow>> {
    if !wacc.is_finite() || wacc <= -1.0 {
        return Err(ValuationError::invalid(format!(
            "discount rate must be finite and greater than -100%, got {wacc}"
        )));
    }

    Ok(years
        .iter()
        .map(|y| {
            let factor = discount_factor(wacc, y.year);
            ProjectionRow {
                year: y.year,
                revenue: y.revenue,
                ebitda: y.ebitda,
                ebit: y.ebit,
                depreciation: y.depreciation,
                capex: y.capex,
                working_capital_change: y.working_capital_change,
                ufcf: y.ufcf,
                discount_factor: factor,
                present_value: y.ufcf * factor,
            }
        })
        .collect())
}

/// Gordon-growth terminal value of the final-year cash flow, discounted
/// back `horizon` years.
///
/// The rates are validated before any division takes place.
///
/// # Errors
///
/// Returns [`ValuationError::DivergentTerminalValue`] when
/// `wacc <= terminal_growth`, or [`ValuationError::InvalidInput`] for
/// non-finite inputs.
///
/// # Example
///
/// ```
/// use marketflow_dcf::terminal_value;
///
/// let tv = terminal_value(100.0, 0.10, 0.02, 5).unwrap();
/// assert!((tv.value - 1275.0).abs() < 1e-9);
///
/// assert!(terminal_value(100.0, 0.08, 0.08, 5).is_err());
/// ```
pub fn terminal_value(
    final_ufcf: f64,
    wacc: f64,
    terminal_growth: f64,
    horizon: u32,
) -> Result<TerminalValue> {
    validate_rates(wacc, terminal_growth)?;
    if !final_ufcf.is_finite() {
        return Err(ValuationError::invalid(format!(
            "final-year cash flow must be finite, got {final_ufcf}"
        )));
    }

    let value = final_ufcf * (1.0 + terminal_growth) / (wacc - terminal_growth);
    Ok(TerminalValue {
        value,
        present_value: value * discount_factor(wacc, horizon),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn year(n: u32, ufcf: f64) -> ProjectedYear {
        ProjectedYear {
            year: n,
            growth: 0.0,
            revenue: 0.0,
            ebitda: 0.0,
            ebit: 0.0,
            depreciation: 0.0,
            capex: 0.0,
            working_capital_change: 0.0,
            ufcf,
        }
    }

    #[test]
    fn test_discount_factor() {
        assert_relative_eq!(discount_factor(0.10, 0), 1.0);
        assert_relative_eq!(discount_factor(0.10, 1), 1.0 / 1.1);
        assert_relative_eq!(discount_factor(0.10, 2), 1.0 / 1.21, epsilon = 1e-12);
        // Years past i32::MAX keep discounting instead of wrapping negative.
        assert_relative_eq!(discount_factor(0.10, u32::MAX), 0.0);
    }

    #[test]
    fn test_discount_rows() {
        let years = vec![year(1, 110.0), year(2, 121.0)];
        let rows = discount(&years, 0.10).unwrap();

        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[0].present_value, 100.0, epsilon = 1e-9);
        assert_relative_eq!(rows[1].present_value, 100.0, epsilon = 1e-9);
        assert_relative_eq!(rows[1].discount_factor, 1.0 / 1.21, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_rejects_bad_rate() {
        assert!(discount(&[year(1, 1.0)], -1.0).is_err());
        assert!(discount(&[year(1, 1.0)], f64::INFINITY).is_err());
    }

    #[test]
    fn test_terminal_value() {
        let tv = terminal_value(100.0, 0.10, 0.025, 5).unwrap();
        let expected = 100.0 * 1.025 / 0.075;
        assert_relative_eq!(tv.value, expected, epsilon = 1e-9);
        assert_relative_eq!(tv.present_value, expected / 1.1_f64.powi(5), epsilon = 1e-9);
        assert!(tv.value > 0.0);
    }

    #[test]
    fn test_terminal_value_equal_rates_diverges() {
        let err = terminal_value(100.0, 0.08, 0.08, 5).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::DivergentTerminalValue { wacc, terminal_growth }
                if wacc == 0.08 && terminal_growth == 0.08
        ));
    }

    #[test]
    fn test_terminal_value_growth_above_wacc() {
        let err = terminal_value(100.0, 0.06, 0.07, 5).unwrap_err();
        assert!(matches!(err, ValuationError::DivergentTerminalValue { .. }));
    }

    #[test]
    fn test_validate_rates() {
        assert!(validate_rates(0.09, 0.025).is_ok());
        assert!(validate_rates(f64::NAN, 0.025).is_err());
        assert!(validate_rates(0.09, f64::NAN).is_err());
    }
}
