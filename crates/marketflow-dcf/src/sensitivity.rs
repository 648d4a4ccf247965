//! WACC × terminal-growth sensitivity of intrinsic value.
//!
//! The projected cash flows are held fixed; only the discount rate and the
//! perpetual growth rate move. Grid cells where the terminal value would
//! diverge (`wacc <= g`) are `NaN`.

use crate::discount::{discount_factor, terminal_value};
use marketflow_core::{Result, ValuationError, ValuationResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Most steps allowed on each side of the base rate.
pub const MAX_STEPS: usize = 10;

/// Configuration for the sensitivity grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Step between WACC rows (default: 0.02)
    pub wacc_step: f64,
    /// Step between terminal growth columns (default: 0.01)
    pub growth_step: f64,
    /// Steps on each side of the base rate (default: 1, i.e. a 3 × 3 grid)
    pub steps: usize,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            wacc_step: 0.02,
            growth_step: 0.01,
            steps: 1,
        }
    }
}

/// Intrinsic value per share over a grid of rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityMatrix {
    /// WACC for each row, ascending.
    pub wacc_values: Vec<f64>,
    /// Terminal growth for each column, ascending.
    pub growth_values: Vec<f64>,
    /// `values[[row, col]]` is the intrinsic value at
    /// `(wacc_values[row], growth_values[col])`.
    pub values: Array2<f64>,
}

impl SensitivityMatrix {
    /// Value at the given WACC row and growth column.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Grid shape as `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Value at the centre of the grid (the base rates).
    #[must_use]
    pub fn base(&self) -> Option<f64> {
        let (rows, cols) = self.shape();
        self.get(rows / 2, cols / 2)
    }
}

fn grid(base: f64, step: f64, k: i32) -> Vec<f64> {
    (-k..=k).map(|i| base + f64::from(i) * step).collect()
}

/// Build the sensitivity matrix around a completed valuation.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidInput`] for non-positive or
/// non-finite steps, more than [`MAX_STEPS`] steps, or a result with no
/// projection rows.
pub fn sensitivity(result: &ValuationResult, config: &SensitivityConfig) -> Result<SensitivityMatrix> {
    for (name, step) in [("WACC step", config.wacc_step), ("growth step", config.growth_step)] {
        if !step.is_finite() || step <= 0.0 {
            return Err(ValuationError::invalid(format!(
                "{name} must be positive, got {step}"
            )));
        }
    }

    let steps = i32::try_from(config.steps)
        .ok()
        .filter(|_| config.steps <= MAX_STEPS)
        .ok_or_else(|| {
            ValuationError::invalid(format!(
                "sensitivity steps must be at most {MAX_STEPS}, got {}",
                config.steps
            ))
        })?;

    let last = result
        .projection
        .last()
        .ok_or_else(|| ValuationError::invalid("valuation has no projection rows"))?;

    let wacc_values = grid(result.wacc(), config.wacc_step, steps);
    let growth_values = grid(result.terminal_growth, config.growth_step, steps);

    let values = Array2::from_shape_fn((wacc_values.len(), growth_values.len()), |(i, j)| {
        let wacc = wacc_values[i];
        let g = growth_values[j];
        let Ok(tv) = terminal_value(last.ufcf, wacc, g, last.year) else {
            return f64::NAN;
        };
        let pv: f64 = result
            .projection
            .iter()
            .map(|r| r.ufcf * discount_factor(wacc, r.year))
            .sum();
        (pv + tv.present_value - result.net_debt) / result.shares_outstanding
    });

    Ok(SensitivityMatrix {
        wacc_values,
        growth_values,
        values,
    })
}
