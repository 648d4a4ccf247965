//! Input types for a single-ticker valuation.
//!
//! [`ValuationInputs`] is the snapshot every valuation starts from. It is
//! deserializable from JSON so offline runs can load inputs from a file,
//! and it is what every [`InputSource`](crate::InputSource) produces.
//!
//! All growth rates, margins and fractions are stored as decimals
//! (`0.05` for 5 %). Display layers multiply by 100.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ticker symbol such as `"AAPL"`.
pub type Ticker = String;

/// Free-form parameters recorded alongside a valuation for transparency.
///
/// Estimated inputs keep the human-readable figures they were derived from
/// here (for example `revenue_growth_pct = 12.4`), and the map is copied
/// verbatim into the persisted record.
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// Default forecast horizon in years.
pub const DEFAULT_HORIZON: usize = 5;

/// Longest forecast horizon a valuation accepts, in years.
pub const MAX_HORIZON: usize = 100;

/// Projected revenue growth.
///
/// In JSON a plain number is a flat rate and an array is a per-year schedule:
///
/// ```
/// use marketflow_core::GrowthSchedule;
///
/// let flat: GrowthSchedule = serde_json::from_str("0.05").unwrap();
/// assert_eq!(flat, GrowthSchedule::Flat(0.05));
///
/// let per_year: GrowthSchedule = serde_json::from_str("[0.1, 0.08, 0.06]").unwrap();
/// assert_eq!(per_year.len_hint(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrowthSchedule {
    /// One rate applied compoundingly in every forecast year.
    Flat(f64),
    /// One rate per forecast year; the length must equal the horizon.
    PerYear(Vec<f64>),
}

impl GrowthSchedule {
    /// Number of rates carried, `None` for a flat rate.
    #[must_use]
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Flat(_) => None,
            Self::PerYear(rates) => Some(rates.len()),
        }
    }

    /// Expand into one rate per year for the given horizon.
    ///
    /// A per-year schedule is returned as-is; length and horizon checks
    /// belong to the projector, which runs them before expanding.
    #[must_use]
    pub fn expand(&self, horizon: usize) -> Vec<f64> {
        match self {
            Self::Flat(rate) => vec![*rate; horizon],
            Self::PerYear(rates) => rates.clone(),
        }
    }

    /// Equivalent compound annual rate of the schedule.
    ///
    /// For a flat schedule this is the rate itself; for a per-year schedule
    /// it is the geometric mean of `1 + g` minus one.
    #[must_use]
    pub fn compound_rate(&self) -> f64 {
        match self {
            Self::Flat(rate) => *rate,
            Self::PerYear(rates) if rates.is_empty() => 0.0,
            Self::PerYear(rates) => {
                let growth: f64 = rates.iter().map(|g| 1.0 + g).product();
                growth.powf(1.0 / rates.len() as f64) - 1.0
            }
        }
    }
}

impl Default for GrowthSchedule {
    fn default() -> Self {
        Self::Flat(0.05)
    }
}

/// Reinvestment assumptions used to bridge EBIT to unlevered free cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reinvestment {
    /// Depreciation & amortization as a fraction of revenue.
    ///
    /// When absent, depreciation is taken as EBITDA − EBIT.
    #[serde(default)]
    pub depreciation_pct: Option<f64>,
    /// Capital expenditure as a fraction of revenue.
    #[serde(default)]
    pub capex_pct: f64,
    /// Net working capital as a fraction of the year-over-year revenue change.
    #[serde(default)]
    pub working_capital_pct: f64,
}

/// Components from which WACC is derived when it is not supplied directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalCosts {
    /// Risk-free rate (e.g. 10-year Treasury yield).
    pub risk_free_rate: f64,
    /// Equity beta.
    pub beta: f64,
    /// Equity risk premium.
    pub equity_risk_premium: f64,
    /// Pre-tax cost of debt.
    pub cost_of_debt: f64,
    /// Debt weight, D / (D + E).
    pub debt_weight: f64,
    /// Equity weight, E / (D + E).
    pub equity_weight: f64,
}

impl Default for CapitalCosts {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.045,
            beta: 1.0,
            equity_risk_premium: 0.055,
            cost_of_debt: 0.06,
            debt_weight: 0.3,
            equity_weight: 0.7,
        }
    }
}

/// Discount rate applied to projected cash flows.
///
/// Serialized externally tagged: `{"wacc": 0.09}` or `{"derived": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountRate {
    /// WACC supplied directly.
    Wacc(f64),
    /// WACC derived from CAPM cost of equity and cost of debt.
    Derived(CapitalCosts),
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::Wacc(0.10)
    }
}

/// Per-ticker snapshot a valuation is computed from.
///
/// # Example
///
/// ```
/// use marketflow_core::{DiscountRate, GrowthSchedule, ValuationInputs};
///
/// let inputs = ValuationInputs::new("acme", 42.0, 1_000_000.0, 50_000_000.0)
///     .with_growth(GrowthSchedule::Flat(0.06))
///     .with_discount(DiscountRate::Wacc(0.09))
///     .with_terminal_growth(0.025);
///
/// assert_eq!(inputs.ticker, "ACME");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Ticker symbol (upper case).
    pub ticker: Ticker,
    /// Company name, when known.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Current share price.
    pub price: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// Trailing (base-year) revenue.
    pub revenue: f64,
    /// Projected revenue growth.
    #[serde(default)]
    pub revenue_growth: GrowthSchedule,
    /// Forecast horizon in years.
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    /// EBITDA margin.
    pub ebitda_margin: f64,
    /// EBIT margin.
    pub ebit_margin: f64,
    /// Tax rate applied to EBIT.
    pub tax_rate: f64,
    /// Depreciation, capex and working-capital assumptions.
    #[serde(default)]
    pub reinvestment: Reinvestment,
    /// Discount rate or its components.
    pub discount: DiscountRate,
    /// Perpetual growth rate after the forecast horizon.
    pub terminal_growth: f64,
    /// Total debt minus cash.
    #[serde(default)]
    pub net_debt: f64,
    /// Figures the inputs were derived from.
    #[serde(default)]
    pub parameters_used: Parameters,
}

const fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

impl ValuationInputs {
    /// Create inputs with the given market and revenue figures and default
    /// assumptions (5 % flat growth, 30 % EBITDA and 20 % EBIT margins, 21 %
    /// tax, 10 % WACC, 2.5 % terminal growth, no reinvestment, no net debt).
    #[must_use]
    pub fn new(ticker: impl AsRef<str>, price: f64, shares_outstanding: f64, revenue: f64) -> Self {
        Self {
            ticker: ticker.as_ref().trim().to_uppercase(),
            company_name: None,
            price,
            shares_outstanding,
            revenue,
            revenue_growth: GrowthSchedule::default(),
            horizon: DEFAULT_HORIZON,
            ebitda_margin: 0.30,
            ebit_margin: 0.20,
            tax_rate: 0.21,
            reinvestment: Reinvestment::default(),
            discount: DiscountRate::default(),
            terminal_growth: 0.025,
            net_debt: 0.0,
            parameters_used: Parameters::new(),
        }
    }

    /// Set the revenue growth schedule.
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthSchedule) -> Self {
        self.revenue_growth = growth;
        self
    }

    /// Set the forecast horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set EBITDA and EBIT margins.
    #[must_use]
    pub const fn with_margins(mut self, ebitda_margin: f64, ebit_margin: f64) -> Self {
        self.ebitda_margin = ebitda_margin;
        self.ebit_margin = ebit_margin;
        self
    }

    /// Set the tax rate.
    #[must_use]
    pub const fn with_tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Set the reinvestment assumptions.
    #[must_use]
    pub const fn with_reinvestment(mut self, reinvestment: Reinvestment) -> Self {
        self.reinvestment = reinvestment;
        self
    }

    /// Set the discount rate.
    #[must_use]
    pub const fn with_discount(mut self, discount: DiscountRate) -> Self {
        self.discount = discount;
        self
    }

    /// Set the terminal growth rate.
    #[must_use]
    pub const fn with_terminal_growth(mut self, terminal_growth: f64) -> Self {
        self.terminal_growth = terminal_growth;
        self
    }

    /// Set net debt.
    #[must_use]
    pub const fn with_net_debt(mut self, net_debt: f64) -> Self {
        self.net_debt = net_debt;
        self
    }

    /// Set the company name.
    #[must_use]
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Record a parameter the inputs were derived from.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters_used.insert(key.into(), value.into());
        self
    }
}
