//! Error types for the marketflow engine.
//!
//! Every failure a single-ticker valuation can hit is a variant of
//! [`ValuationError`]. Batch runs record the rendered message of the error
//! in the ticker's slot, so the `Display` strings are part of the output.

use thiserror::Error;

/// The main error type for valuation operations.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// An input value is out of range or inconsistent with the others.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The discount rate does not exceed the terminal growth rate, so the
    /// Gordon growth perpetuity has no finite positive value.
    #[error(
        "Divergent terminal value: WACC ({:.2}%) must be greater than terminal growth ({:.2}%)",
        .wacc * 100.0,
        .terminal_growth * 100.0
    )]
    DivergentTerminalValue {
        /// Discount rate used.
        wacc: f64,
        /// Perpetual growth rate used.
        terminal_growth: f64,
    },

    /// Capital structure weights are negative or do not sum to one.
    #[error("Invalid capital structure weights: debt {debt:.4} + equity {equity:.4} = {sum:.4}, expected 1")]
    InvalidWeights {
        /// Debt weight.
        debt: f64,
        /// Equity weight.
        equity: f64,
        /// Sum of the weights.
        sum: f64,
    },

    /// A field required to build inputs was not available.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Error fetching data from an external source.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Ticker is not known to the input source.
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl ValuationError {
    /// Shorthand for [`ValuationError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<String> for ValuationError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ValuationError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;
