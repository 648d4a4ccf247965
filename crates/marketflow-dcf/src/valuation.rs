//! End-to-end single-ticker valuation.
//!
//! [`DcfModel::value`] runs the whole pipeline:
//! inputs → projection → discounting → terminal value → aggregation →
//! classification.

use crate::discount::{TerminalValue, discount, terminal_value, validate_rates};
use crate::projection::{CashFlowProjector, ProjectionConfig};
use crate::recommendation::{classify, upside_pct};
use crate::wacc::resolve_discount_rate;
use chrono::{DateTime, Utc};
use marketflow_core::{ProjectionRow, Result, ValuationError, ValuationInputs, ValuationResult};
use serde::{Deserialize, Serialize};

/// Configuration for the DCF model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DcfConfig {
    /// Projector settings.
    pub projection: ProjectionConfig,
}

/// Enterprise-to-equity bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Σ PV(ufcf) + PV(terminal value).
    pub enterprise_value: f64,
    /// Enterprise value − net debt.
    pub equity_value: f64,
    /// Equity value / shares outstanding.
    pub intrinsic_value: f64,
}

/// Sum discounted cash flows and terminal value into per-share value.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidInput`] when shares outstanding is not
/// positive or net debt is not finite.
pub fn aggregate(
    rows: &[ProjectionRow],
    terminal: &TerminalValue,
    net_debt: f64,
    shares_outstanding: f64,
) -> Result<Aggregate> {
    if !shares_outstanding.is_finite() || shares_outstanding <= 0.0 {
        return Err(ValuationError::invalid(format!(
            "shares outstanding must be positive, got {shares_outstanding}"
        )));
    }
    if !net_debt.is_finite() {
        return Err(ValuationError::invalid(format!(
            "net debt must be finite, got {net_debt}"
        )));
    }

    let enterprise_value = rows.iter().map(|r| r.present_value).sum::<f64>() + terminal.present_value;
    let equity_value = enterprise_value - net_debt;

    Ok(Aggregate {
        enterprise_value,
        equity_value,
        intrinsic_value: equity_value / shares_outstanding,
    })
}

/// Discounted-cash-flow valuation model.
///
/// # Example
///
/// ```
/// use marketflow_core::{DiscountRate, GrowthSchedule, Recommendation, ValuationInputs};
/// use marketflow_dcf::DcfModel;
///
/// let inputs = ValuationInputs::new("ACME", 10.0, 1_000_000.0, 50_000_000.0)
///     .with_growth(GrowthSchedule::Flat(0.05))
///     .with_discount(DiscountRate::Wacc(0.09))
///     .with_terminal_growth(0.025);
///
/// let result = DcfModel::default().value(&inputs).unwrap();
/// assert_eq!(result.projection.len(), 5);
/// assert!(result.intrinsic_value.is_finite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DcfModel {
    projector: CashFlowProjector,
}

impl DcfModel {
    /// Create a model with the given configuration.
    #[must_use]
    pub const fn new(config: DcfConfig) -> Self {
        Self {
            projector: CashFlowProjector::new(config.projection),
        }
    }

    /// Value one ticker, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`],
    /// [`ValuationError::InvalidWeights`] or
    /// [`ValuationError::DivergentTerminalValue`] when the inputs cannot be
    /// valued; nothing is computed past the first failed check.
    pub fn value(&self, inputs: &ValuationInputs) -> Result<ValuationResult> {
        self.value_at(inputs, Utc::now())
    }

    /// Value one ticker with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See [`DcfModel::value`].
    pub fn value_at(&self, inputs: &ValuationInputs, valued_at: DateTime<Utc>) -> Result<ValuationResult> {
        let cost_of_capital = resolve_discount_rate(&inputs.discount, inputs.tax_rate)?;
        let wacc = cost_of_capital.wacc;
        validate_rates(wacc, inputs.terminal_growth)?;

        if !inputs.price.is_finite() {
            return Err(ValuationError::invalid(format!(
                "price must be finite, got {}",
                inputs.price
            )));
        }

        let years = self.projector.project(inputs)?;
        let rows = discount(&years, wacc)?;

        let (final_ufcf, horizon) = rows
            .last()
            .map(|r| (r.ufcf, r.year))
            .ok_or_else(|| ValuationError::invalid("projection produced no forecast years"))?;
        let terminal = terminal_value(final_ufcf, wacc, inputs.terminal_growth, horizon)?;

        let totals = aggregate(&rows, &terminal, inputs.net_debt, inputs.shares_outstanding)?;
        let upside = upside_pct(totals.intrinsic_value, inputs.price);

        Ok(ValuationResult {
            ticker: inputs.ticker.clone(),
            company_name: inputs.company_name.clone(),
            price: inputs.price,
            intrinsic_value: totals.intrinsic_value,
            upside,
            enterprise_value: totals.enterprise_value,
            equity_value: totals.equity_value,
            net_debt: inputs.net_debt,
            shares_outstanding: inputs.shares_outstanding,
            cost_of_capital,
            revenue_growth: inputs.revenue_growth.compound_rate(),
            terminal_growth: inputs.terminal_growth,
            ebitda_margin: inputs.ebitda_margin,
            projection: rows,
            terminal_value: terminal.value,
            terminal_value_pv: terminal.present_value,
            recommendation: classify(upside),
            parameters_used: inputs.parameters_used.clone(),
            valued_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marketflow_core::{CapitalCosts, DiscountRate, GrowthSchedule, Recommendation};

    fn inputs() -> ValuationInputs {
        ValuationInputs::new("TEST", 100.0, 1_000.0, 1_000_000.0)
            .with_growth(GrowthSchedule::Flat(0.05))
            .with_margins(0.30, 0.20)
            .with_tax_rate(0.25)
            .with_discount(DiscountRate::Wacc(0.10))
            .with_terminal_growth(0.02)
    }

    #[test]
    fn test_value_matches_hand_computation() {
        let result = DcfModel::default().value(&inputs()).unwrap();

        // ufcf(n) = revenue(n) × (0.2 × 0.75 + 0.1) = revenue(n) × 0.25
        let mut pv = 0.0;
        let mut revenue = 1_000_000.0;
        for n in 1..=5 {
            revenue *= 1.05;
            pv += revenue * 0.25 / 1.1_f64.powi(n);
        }
        let final_ufcf = revenue * 0.25;
        let tv = final_ufcf * 1.02 / 0.08;
        let ev = pv + tv / 1.1_f64.powi(5);

        assert_relative_eq!(result.terminal_value, tv, epsilon = 1e-6);
        assert_relative_eq!(result.enterprise_value, ev, epsilon = 1e-6);
        assert_relative_eq!(result.equity_value, ev, epsilon = 1e-6);
        assert_relative_eq!(result.intrinsic_value, ev / 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.pv_of_cash_flows(), pv, epsilon = 1e-6);
        assert_relative_eq!(result.revenue_growth, 0.05);
    }

    #[test]
    fn test_oversized_horizon_is_an_error() {
        let inputs = ValuationInputs::new("X", 10.0, 1_000.0, 1e6).with_horizon(usize::MAX);
        let err = DcfModel::default().value(&inputs).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
    }

    #[test]
    fn test_value_is_finite_and_tv_positive() {
        for (wacc, g) in [(0.06, 0.0), (0.08, 0.03), (0.12, 0.025), (0.2, -0.01)] {
            let inputs = inputs()
                .with_discount(DiscountRate::Wacc(wacc))
                .with_terminal_growth(g);
            let result = DcfModel::default().value(&inputs).unwrap();
            assert!(result.equity_value.is_finite());
            assert!(result.projection.last().unwrap().ufcf > 0.0);
            assert!(result.terminal_value > 0.0);
        }
    }

    #[test]
    fn test_net_debt_reduces_equity() {
        let result = DcfModel::default()
            .value(&inputs().with_net_debt(500_000.0))
            .unwrap();
        assert_relative_eq!(
            result.equity_value,
            result.enterprise_value - 500_000.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_divergent_terminal_value() {
        let inputs = inputs()
            .with_discount(DiscountRate::Wacc(0.08))
            .with_terminal_growth(0.08);
        let err = DcfModel::default().value(&inputs).unwrap_err();
        assert!(matches!(err, ValuationError::DivergentTerminalValue { .. }));
    }

    #[test]
    fn test_zero_price_upside_undefined() {
        let mut inputs = inputs();
        inputs.price = 0.0;
        let result = DcfModel::default().value(&inputs).unwrap();
        assert_eq!(result.upside, None);
        assert_eq!(result.recommendation, Recommendation::Avoid);
        assert!(result.to_record().upside.is_none());
    }

    #[test]
    fn test_zero_shares_rejected() {
        let mut inputs = inputs();
        inputs.shares_outstanding = 0.0;
        let err = DcfModel::default().value(&inputs).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
    }

    #[test]
    fn test_derived_wacc_path() {
        let inputs = inputs().with_discount(DiscountRate::Derived(CapitalCosts {
            risk_free_rate: 0.04,
            beta: 1.0,
            equity_risk_premium: 0.05,
            cost_of_debt: 0.05,
            debt_weight: 0.5,
            equity_weight: 0.5,
        }));
        let result = DcfModel::default().value(&inputs).unwrap();
        // 0.5 × 0.09 + 0.5 × 0.05 × 0.75
        assert_relative_eq!(result.wacc(), 0.06375, epsilon = 1e-12);
        assert!(result.cost_of_capital.cost_of_equity.is_some());
    }

    #[test]
    fn test_invalid_weights_propagate() {
        let inputs = inputs().with_discount(DiscountRate::Derived(CapitalCosts {
            debt_weight: 0.5,
            equity_weight: 0.6,
            ..CapitalCosts::default()
        }));
        let err = DcfModel::default().value(&inputs).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidWeights { .. }));
    }

    #[test]
    fn test_recommendation_follows_upside() {
        let result = DcfModel::default().value(&inputs()).unwrap();
        assert_eq!(result.recommendation, classify(result.upside));
    }

    #[test]
    fn test_aggregate_rejects_non_finite_net_debt() {
        let tv = TerminalValue {
            value: 1.0,
            present_value: 1.0,
        };
        assert!(aggregate(&[], &tv, f64::NAN, 1.0).is_err());
        let totals = aggregate(&[], &tv, 0.5, 2.0).unwrap();
        assert_relative_eq!(totals.intrinsic_value, 0.25);
    }
}
