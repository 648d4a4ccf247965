//! Valuation outputs.
//!
//! A valuation produces one [`ValuationResult`], the full, unrounded
//! computation. [`ValuationRecord`] is the rounded projection of it that is
//! persisted and shown on the dashboard; its field names and the
//! [`Recommendation`] labels are consumed verbatim by display code.

use crate::{Parameters, Ticker};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categorical recommendation derived from upside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Recommendation {
    /// Upside of at least 50 %.
    #[display("STRONG BUY")]
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    /// Upside between 20 % and 50 %.
    #[display("BUY")]
    #[serde(rename = "BUY")]
    Buy,
    /// Upside between −20 % and 20 %.
    #[display("HOLD")]
    #[serde(rename = "HOLD")]
    Hold,
    /// Upside between −50 % and −20 %.
    #[display("SELL")]
    #[serde(rename = "SELL")]
    Sell,
    /// Upside of −50 % or worse, or undefined.
    #[display("AVOID")]
    #[serde(rename = "AVOID")]
    Avoid,
}

impl Recommendation {
    /// All labels, most bullish first.
    pub const ALL: [Self; 5] = [Self::StrongBuy, Self::Buy, Self::Hold, Self::Sell, Self::Avoid];

    /// The display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::Avoid => "AVOID",
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| format!("Unknown recommendation: {s}"))
    }
}

/// One forecast year of the projection, discounted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Forecast year, starting at 1.
    pub year: u32,
    /// Projected revenue.
    pub revenue: f64,
    /// Revenue × EBITDA margin.
    pub ebitda: f64,
    /// Revenue × EBIT margin.
    pub ebit: f64,
    /// Depreciation & amortization.
    pub depreciation: f64,
    /// Capital expenditure.
    pub capex: f64,
    /// Increase in net working capital.
    pub working_capital_change: f64,
    /// Unlevered free cash flow.
    pub ufcf: f64,
    /// `1 / (1 + WACC)^year`.
    pub discount_factor: f64,
    /// `ufcf × discount_factor`.
    pub present_value: f64,
}

/// How the discount rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapital {
    /// Discount rate applied.
    pub wacc: f64,
    /// CAPM cost of equity, when derived.
    pub cost_of_equity: Option<f64>,
    /// After-tax cost of debt, when derived.
    pub after_tax_cost_of_debt: Option<f64>,
    /// Debt weight, when derived.
    pub debt_weight: Option<f64>,
    /// Equity weight, when derived.
    pub equity_weight: Option<f64>,
}

impl CostOfCapital {
    /// A discount rate supplied directly, with no breakdown.
    #[must_use]
    pub const fn direct(wacc: f64) -> Self {
        Self {
            wacc,
            cost_of_equity: None,
            after_tax_cost_of_debt: None,
            debt_weight: None,
            equity_weight: None,
        }
    }
}

/// Complete output of a single-ticker DCF valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Company name, when known.
    pub company_name: Option<String>,
    /// Share price the upside is measured against.
    pub price: f64,
    /// Intrinsic equity value per share.
    pub intrinsic_value: f64,
    /// `(intrinsic − price) / price × 100`; `None` when price ≤ 0.
    pub upside: Option<f64>,
    /// Sum of discounted cash flows plus discounted terminal value.
    pub enterprise_value: f64,
    /// Enterprise value minus net debt.
    pub equity_value: f64,
    /// Net debt subtracted from enterprise value.
    pub net_debt: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// Discount rate and its breakdown.
    pub cost_of_capital: CostOfCapital,
    /// Compound revenue growth over the horizon.
    pub revenue_growth: f64,
    /// Perpetual growth rate.
    pub terminal_growth: f64,
    /// EBITDA margin used.
    pub ebitda_margin: f64,
    /// Discounted forecast years.
    pub projection: Vec<ProjectionRow>,
    /// Undiscounted terminal value at the end of the horizon.
    pub terminal_value: f64,
    /// Terminal value discounted with the final year's factor.
    pub terminal_value_pv: f64,
    /// Recommendation derived from upside.
    pub recommendation: Recommendation,
    /// Figures the inputs were derived from.
    pub parameters_used: Parameters,
    /// When the valuation was computed.
    pub valued_at: DateTime<Utc>,
}

impl ValuationResult {
    /// Discount rate applied.
    #[must_use]
    pub const fn wacc(&self) -> f64 {
        self.cost_of_capital.wacc
    }

    /// Sum of the discounted forecast-year cash flows.
    #[must_use]
    pub fn pv_of_cash_flows(&self) -> f64 {
        self.projection.iter().map(|r| r.present_value).sum()
    }

    /// Share of enterprise value contributed by the terminal value.
    #[must_use]
    pub fn terminal_value_share(&self) -> Option<f64> {
        (self.enterprise_value != 0.0).then(|| self.terminal_value_pv / self.enterprise_value)
    }

    /// The rounded record persisted for this result.
    #[must_use]
    pub fn to_record(&self) -> ValuationRecord {
        ValuationRecord::from(self)
    }
}

/// Round to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// The per-ticker record consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Share price, 2 decimals.
    pub price: f64,
    /// Intrinsic value per share, 2 decimals.
    pub intrinsic: f64,
    /// Upside percentage, 2 decimals; `null` when undefined.
    pub upside: Option<f64>,
    /// Recommendation label.
    pub recommendation: Recommendation,
    /// Discount rate, 4 decimals.
    pub wacc: f64,
    /// Revenue growth, 4 decimals.
    pub rev_growth: f64,
    /// Figures the inputs were derived from.
    pub parameters_used: Parameters,
    /// RFC 3339 UTC timestamp.
    pub updated_at: String,
}

impl From<&ValuationResult> for ValuationRecord {
    fn from(result: &ValuationResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            price: round_to(result.price, 2),
            intrinsic: round_to(result.intrinsic_value, 2),
            upside: result.upside.map(|u| round_to(u, 2)),
            recommendation: result.recommendation,
            wacc: round_to(result.wacc(), 4),
            rev_growth: round_to(result.revenue_growth, 4),
            parameters_used: result.parameters_used.clone(),
            updated_at: result
                .valued_at
                .to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn sample_result(upside: Option<f64>) -> ValuationResult {
        ValuationResult {
            ticker: "ACME".to_string(),
            company_name: None,
            price: 10.123,
            intrinsic_value: 12.3456,
            upside,
            enterprise_value: 100.0,
            equity_value: 90.0,
            net_debt: 10.0,
            shares_outstanding: 8.0,
            cost_of_capital: CostOfCapital::direct(0.091_234_5),
            revenue_growth: 0.054_321,
            terminal_growth: 0.025,
            ebitda_margin: 0.3,
            projection: Vec::new(),
            terminal_value: 80.0,
            terminal_value_pv: 60.0,
            recommendation: Recommendation::Buy,
            parameters_used: Parameters::new(),
            valued_at: Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Recommendation::StrongBuy.to_string(), "STRONG BUY");
        assert_eq!(Recommendation::Avoid.as_str(), "AVOID");
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongBuy).unwrap(),
            "\"STRONG BUY\""
        );
        for r in Recommendation::ALL {
            assert_eq!(r.to_string(), r.as_str());
        }
    }

    #[test]
    fn test_parse_label() {
        assert_eq!("strong buy".parse(), Ok(Recommendation::StrongBuy));
        assert_eq!("STRONG_BUY".parse(), Ok(Recommendation::StrongBuy));
        assert_eq!("sell".parse(), Ok(Recommendation::Sell));
        assert!("moon".parse::<Recommendation>().is_err());
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(1.23456, 2), 1.23);
        assert_relative_eq!(round_to(0.0912345, 4), 0.0912);
        assert_relative_eq!(round_to(-3.46, 1), -3.5);
    }

    #[test]
    fn test_record_rounding() {
        let record = sample_result(Some(21.957_1)).to_record();
        assert_relative_eq!(record.price, 10.12);
        assert_relative_eq!(record.intrinsic, 12.35);
        assert_relative_eq!(record.upside.unwrap(), 21.96);
        assert_relative_eq!(record.wacc, 0.0912);
        assert_relative_eq!(record.rev_growth, 0.0543);
        assert!(record.updated_at.starts_with("2025-03-04T15:00:00"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = sample_result(None).to_record();
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "intrinsic",
                "parameters_used",
                "price",
                "rev_growth",
                "recommendation",
                "ticker",
                "updated_at",
                "upside",
                "wacc"
            ]
        );
        assert!(obj["upside"].is_null());
        assert_eq!(obj["recommendation"], "BUY");
    }

    #[test]
    fn test_terminal_value_share() {
        let result = sample_result(None);
        assert_relative_eq!(result.terminal_value_share().unwrap(), 0.6);
        assert_relative_eq!(result.pv_of_cash_flows(), 0.0);
    }
}
