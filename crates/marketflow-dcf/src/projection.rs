//! Cash-flow projection.
//!
//! Grows base-year revenue through the forecast horizon and bridges each
//! year's EBIT to unlevered free cash flow:
//!
//! ```text
//! revenue(n)  = revenue(n-1) × (1 + growth(n))
//! ebitda(n)   = revenue(n) × ebitda_margin
//! ebit(n)     = revenue(n) × ebit_margin
//! d&a(n)      = revenue(n) × depreciation_pct   (or ebitda − ebit)
//! capex(n)    = revenue(n) × capex_pct
//! Δwc(n)      = (revenue(n) − revenue(n-1)) × working_capital_pct
//! ufcf(n)     = ebit(n) × (1 − tax) + d&a(n) − capex(n) − Δwc(n)
//! ```

use marketflow_core::{GrowthSchedule, MAX_HORIZON, Result, ValuationError, ValuationInputs};
use serde::{Deserialize, Serialize};

/// Configuration for the cash-flow projector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Lowest EBITDA margin accepted before inputs are rejected (default: -0.5)
    pub min_ebitda_margin: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            min_ebitda_margin: -0.5,
        }
    }
}

/// One undiscounted forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    /// Forecast year, starting at 1.
    pub year: u32,
    /// Growth rate applied to reach this year's revenue.
    pub growth: f64,
    /// Projected revenue.
    pub revenue: f64,
    /// EBITDA.
    pub ebitda: f64,
    /// EBIT.
    pub ebit: f64,
    /// Depreciation & amortization.
    pub depreciation: f64,
    /// Capital expenditure.
    pub capex: f64,
    /// Increase in net working capital.
    pub working_capital_change: f64,
    /// Unlevered free cash flow.
    pub ufcf: f64,
}

/// Projects unlevered free cash flows over the forecast horizon.
///
/// # Example
///
/// ```
/// use marketflow_core::{GrowthSchedule, ValuationInputs};
/// use marketflow_dcf::CashFlowProjector;
///
/// let inputs = ValuationInputs::new("ACME", 10.0, 1_000.0, 1_000_000.0)
///     .with_growth(GrowthSchedule::Flat(0.05));
///
/// let years = CashFlowProjector::default().project(&inputs).unwrap();
/// assert_eq!(years.len(), 5);
/// assert!((years[4].revenue - 1_276_281.5625).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CashFlowProjector {
    config: ProjectionConfig,
}

impl CashFlowProjector {
    /// Create a projector with the given configuration.
    #[must_use]
    pub const fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Get the configured EBITDA margin floor.
    #[must_use]
    pub const fn min_ebitda_margin(&self) -> f64 {
        self.config.min_ebitda_margin
    }

    /// Project the forecast years for the given inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] when base revenue is not
    /// positive, a margin or fraction is out of range, the EBITDA margin is
    /// below the configured floor, a growth rate is ≤ −100 %, or a per-year
    /// growth schedule does not match the horizon.
    pub fn project(&self, inputs: &ValuationInputs) -> Result<Vec<ProjectedYear>> {
        self.validate(inputs)?;

        let growth = inputs.revenue_growth.expand(inputs.horizon);
        let reinvestment = &inputs.reinvestment;

        let mut years = Vec::with_capacity(inputs.horizon);
        let mut previous_revenue = inputs.revenue;

        for (year, g) in (1..).zip(&growth) {
            let revenue = previous_revenue * (1.0 + g);
            let ebitda = revenue * inputs.ebitda_margin;
            let ebit = revenue * inputs.ebit_margin;
            let depreciation = reinvestment
                .depreciation_pct
                .map_or(ebitda - ebit, |pct| revenue * pct);
            let capex = revenue * reinvestment.capex_pct;
            let working_capital_change = (revenue - previous_revenue) * reinvestment.working_capital_pct;
            let ufcf = ebit * (1.0 - inputs.tax_rate) + depreciation - capex - working_capital_change;

            years.push(ProjectedYear {
                year,
                growth: *g,
                revenue,
                ebitda,
                ebit,
                depreciation,
                capex,
                working_capital_change,
                ufcf,
            });

            previous_revenue = revenue;
        }

        Ok(years)
    }

    fn validate(&self, inputs: &ValuationInputs) -> Result<()> {
        if !inputs.revenue.is_finite() || inputs.revenue <= 0.0 {
            return Err(ValuationError::invalid(format!(
                "base revenue must be positive, got {}",
                inputs.revenue
            )));
        }

        if inputs.horizon == 0 {
            return Err(ValuationError::invalid("forecast horizon must be at least one year"));
        }

        if inputs.horizon > MAX_HORIZON {
            return Err(ValuationError::invalid(format!(
                "forecast horizon must be at most {MAX_HORIZON} years, got {}",
                inputs.horizon
            )));
        }

        if let Some(len) = inputs.revenue_growth.len_hint()
            && len != inputs.horizon
        {
            return Err(ValuationError::invalid(format!(
                "growth schedule has {len} rates but the horizon is {} years",
                inputs.horizon
            )));
        }

        let rates = match &inputs.revenue_growth {
            GrowthSchedule::Flat(rate) => std::slice::from_ref(rate),
            GrowthSchedule::PerYear(rates) => rates.as_slice(),
        };
        for &g in rates {
            if !g.is_finite() || g <= -1.0 {
                return Err(ValuationError::invalid(format!(
                    "growth rate must be finite and greater than -100%, got {g}"
                )));
            }
        }

        check_range("EBITDA margin", inputs.ebitda_margin, -1.0, 1.0)?;
        check_range("EBIT margin", inputs.ebit_margin, -1.0, 1.0)?;

        if inputs.ebitda_margin < self.config.min_ebitda_margin {
            return Err(ValuationError::invalid(format!(
                "EBITDA margin {:.2}% is below the floor of {:.2}%",
                inputs.ebitda_margin * 100.0,
                self.config.min_ebitda_margin * 100.0
            )));
        }

        if !inputs.tax_rate.is_finite() || !(0.0..1.0).contains(&inputs.tax_rate) {
            return Err(ValuationError::invalid(format!(
                "tax rate must be in [0, 1), got {}",
                inputs.tax_rate
            )));
        }

        let reinvestment = &inputs.reinvestment;
        if let Some(pct) = reinvestment.depreciation_pct {
            check_range("depreciation fraction", pct, 0.0, 1.0)?;
        }
        check_range("capex fraction", reinvestment.capex_pct, 0.0, 1.0)?;
        check_range(
            "working capital fraction",
            reinvestment.working_capital_pct,
            -1.0,
            1.0,
        )?;

        Ok(())
    }
}

fn check_range(name: &str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(ValuationError::invalid(format!(
            "{name} must be in [{lo}, {hi}], got {value}"
        )))
    }
}
