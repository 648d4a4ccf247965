//! Weighted average cost of capital.
//!
//! When a discount rate is not supplied directly it is derived from the
//! CAPM cost of equity and the after-tax cost of debt, weighted by the
//! target capital structure.

use marketflow_core::{CapitalCosts, CostOfCapital, DiscountRate, Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Tolerance for capital structure weights summing to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Debt-to-capital ratio assumed when none is available.
pub const DEFAULT_DEBT_RATIO: f64 = 0.3;

/// Target capital structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    /// D / (D + E).
    pub debt_weight: f64,
    /// E / (D + E).
    pub equity_weight: f64,
}

impl CapitalStructure {
    /// Create and validate a capital structure.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidWeights`] when either weight is
    /// negative or non-finite, or the weights do not sum to one within
    /// [`WEIGHT_TOLERANCE`].
    pub fn new(debt_weight: f64, equity_weight: f64) -> Result<Self> {
        let sum = debt_weight + equity_weight;
        let valid = debt_weight.is_finite()
            && equity_weight.is_finite()
            && debt_weight >= 0.0
            && equity_weight >= 0.0
            && (sum - 1.0).abs() <= WEIGHT_TOLERANCE;

        if !valid {
            return Err(ValuationError::InvalidWeights {
                debt: debt_weight,
                equity: equity_weight,
                sum,
            });
        }

        Ok(Self {
            debt_weight,
            equity_weight,
        })
    }

    /// Weights `(d, 1 − d)` from a debt-to-capital ratio.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidWeights`] when the ratio is outside
    /// [0, 1].
    pub fn from_debt_ratio(debt_ratio: f64) -> Result<Self> {
        Self::new(debt_ratio, 1.0 - debt_ratio)
    }
}

impl Default for CapitalStructure {
    fn default() -> Self {
        Self {
            debt_weight: DEFAULT_DEBT_RATIO,
            equity_weight: 1.0 - DEFAULT_DEBT_RATIO,
        }
    }
}

/// CAPM cost of equity: `risk_free + beta × equity_risk_premium`.
#[must_use]
pub fn cost_of_equity(risk_free_rate: f64, beta: f64, equity_risk_premium: f64) -> f64 {
    risk_free_rate + beta * equity_risk_premium
}

/// Derive WACC from its components.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidWeights`] for a bad capital structure
/// and [`ValuationError::InvalidInput`] for non-finite components or a tax
/// rate outside [0, 1).
///
/// # Example
///
/// ```
/// use marketflow_core::CapitalCosts;
/// use marketflow_dcf::derive_wacc;
///
/// let costs = CapitalCosts {
///     risk_free_rate: 0.04,
///     beta: 1.0,
///     equity_risk_premium: 0.05,
///     cost_of_debt: 0.05,
///     debt_weight: 0.5,
///     equity_weight: 0.5,
/// };
/// let wacc = derive_wacc(&costs, 0.2).unwrap();
/// // 0.5 × 9% + 0.5 × 5% × 0.8
/// assert!((wacc.wacc - 0.065).abs() < 1e-12);
/// ```
pub fn derive_wacc(costs: &CapitalCosts, tax_rate: f64) -> Result<CostOfCapital> {
    let structure = CapitalStructure::new(costs.debt_weight, costs.equity_weight)?;

    let components = [
        ("risk-free rate", costs.risk_free_rate),
        ("beta", costs.beta),
        ("equity risk premium", costs.equity_risk_premium),
        ("cost of debt", costs.cost_of_debt),
    ];
    for (name, value) in components {
        if !value.is_finite() {
            return Err(ValuationError::invalid(format!("{name} must be finite, got {value}")));
        }
    }
    if !tax_rate.is_finite() || !(0.0..1.0).contains(&tax_rate) {
        return Err(ValuationError::invalid(format!(
            "tax rate must be in [0, 1), got {tax_rate}"
        )));
    }

    let k_e = cost_of_equity(costs.risk_free_rate, costs.beta, costs.equity_risk_premium);
    let k_d = costs.cost_of_debt * (1.0 - tax_rate);
    let wacc = structure.equity_weight * k_e + structure.debt_weight * k_d;

    Ok(CostOfCapital {
        wacc,
        cost_of_equity: Some(k_e),
        after_tax_cost_of_debt: Some(k_d),
        debt_weight: Some(structure.debt_weight),
        equity_weight: Some(structure.equity_weight),
    })
}

/// Resolve a [`DiscountRate`] into the rate actually applied.
///
/// # Errors
///
/// Propagates the errors of [`derive_wacc`]; a directly supplied rate must
/// be finite.
pub fn resolve_discount_rate(discount: &DiscountRate, tax_rate: f64) -> Result<CostOfCapital> {
    match discount {
        DiscountRate::Wacc(rate) if rate.is_finite() => Ok(CostOfCapital::direct(*rate)),
        DiscountRate::Wacc(rate) => Err(ValuationError::invalid(format!(
            "discount rate must be finite, got {rate}"
        ))),
        DiscountRate::Derived(costs) => derive_wacc(costs, tax_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn costs(debt: f64, equity: f64) -> CapitalCosts {
        CapitalCosts {
            risk_free_rate: 0.045,
            beta: 1.2,
            equity_risk_premium: 0.055,
            cost_of_debt: 0.06,
            debt_weight: debt,
            equity_weight: equity,
        }
    }

    #[test]
    fn test_cost_of_equity() {
        assert_relative_eq!(cost_of_equity(0.045, 1.2, 0.055), 0.111, epsilon = 1e-12);
        assert_relative_eq!(cost_of_equity(0.04, 0.0, 0.05), 0.04);
    }

    #[test]
    fn test_derive_wacc() {
        let result = derive_wacc(&costs(0.3, 0.7), 0.21).unwrap();

        let k_e = 0.045 + 1.2 * 0.055;
        let k_d = 0.06 * (1.0 - 0.21);
        assert_relative_eq!(result.wacc, 0.7 * k_e + 0.3 * k_d, epsilon = 1e-12);
        assert_relative_eq!(result.cost_of_equity.unwrap(), k_e, epsilon = 1e-12);
        assert_relative_eq!(result.after_tax_cost_of_debt.unwrap(), k_d, epsilon = 1e-12);
        assert_eq!(result.debt_weight, Some(0.3));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let err = derive_wacc(&costs(0.3, 0.6), 0.21).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidWeights { sum, .. } if (sum - 0.9).abs() < 1e-12));

        assert!(derive_wacc(&costs(0.3, 0.7 + 1e-9), 0.21).is_ok());
        assert!(derive_wacc(&costs(0.3, 0.7 + 1e-4), 0.21).is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(CapitalStructure::new(-0.2, 1.2).is_err());
        assert!(CapitalStructure::from_debt_ratio(1.5).is_err());
    }

    #[test]
    fn test_from_debt_ratio() {
        let structure = CapitalStructure::from_debt_ratio(0.25).unwrap();
        assert_relative_eq!(structure.equity_weight, 0.75);
        assert_eq!(CapitalStructure::default().debt_weight, DEFAULT_DEBT_RATIO);
    }

    #[test]
    fn test_resolve_direct() {
        let coc = resolve_discount_rate(&DiscountRate::Wacc(0.09), 0.21).unwrap();
        assert_relative_eq!(coc.wacc, 0.09);
        assert!(coc.cost_of_equity.is_none());

        assert!(resolve_discount_rate(&DiscountRate::Wacc(f64::NAN), 0.21).is_err());
    }

    #[test]
    fn test_resolve_derived_bad_tax() {
        let discount = DiscountRate::Derived(costs(0.3, 0.7));
        assert!(resolve_discount_rate(&discount, 1.2).is_err());
    }
}
