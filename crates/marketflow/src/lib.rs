#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/marketflow/marketflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # marketflow
//!
//! marketflow is an umbrella crate that re-exports all marketflow sub-crates
//! for convenience.
//!
//! ## Quick Start
//!
//! ```
//! use marketflow::{DcfModel, DiscountRate, GrowthSchedule, ValuationInputs};
//!
//! let inputs = ValuationInputs::new("ACME", 40.0, 10_000_000.0, 500_000_000.0)
//!     .with_growth(GrowthSchedule::Flat(0.06))
//!     .with_margins(0.25, 0.18)
//!     .with_discount(DiscountRate::Wacc(0.09))
//!     .with_terminal_growth(0.025);
//!
//! let result = DcfModel::default().value(&inputs)?;
//! println!(
//!     "{}: intrinsic {:.2} vs price {:.2} -> {}",
//!     result.ticker, result.intrinsic_value, result.price, result.recommendation
//! );
//! # Ok::<(), marketflow::ValuationError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Data model, errors and the [`InputSource`] seam
//! - [`dcf`] - Projection, discounting, WACC, classification, sensitivity
//! - [`fmp`] - Financial Modeling Prep client and input source
//! - [`batch`] - Concurrent batch runner and result store

/// Version information for the marketflow crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Data model shared by every stage.
///
/// - [`ValuationInputs`] - what a valuation is computed from
/// - [`ValuationResult`] - the full computation
/// - [`ValuationRecord`] - the rounded per-ticker output record
/// - [`InputSource`] - where inputs come from
pub mod model {
    pub use marketflow_core::*;
}

pub use marketflow_core::{
    CapitalCosts, DiscountRate, GrowthSchedule, InputSource, ProjectionRow, Recommendation,
    Reinvestment, Result, StaticInputSource, Ticker, ValuationError, ValuationInputs,
    ValuationRecord, ValuationResult,
};

// ============================================================================
// DCF Computation
// ============================================================================

/// Discounted-cash-flow computation.
///
/// ## Pipeline
///
/// ```text
/// revenue(n)  = revenue(n-1) × (1 + g(n))
/// ufcf(n)     = ebit(n) × (1 − t) + d&a(n) − capex(n) − Δwc(n)
/// pv(n)       = ufcf(n) / (1 + wacc)^n
/// tv          = ufcf(N) × (1 + g∞) / (wacc − g∞)
/// equity      = Σ pv(n) + tv / (1 + wacc)^N − net debt
/// intrinsic   = equity / shares outstanding
/// ```
pub mod dcf {
    pub use marketflow_dcf::*;
}

pub use marketflow_dcf::{DcfModel, SensitivityConfig, SensitivityMatrix, classify, sensitivity};

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) API client.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
///
/// ## Example
///
/// ```ignore
/// use marketflow::fmp::{FmpInputSource, SourceConfig};
/// use marketflow::InputSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = FmpInputSource::from_env(SourceConfig::default())?;
///     let inputs = source.fetch_inputs("NVDA").await?;
///     println!("{:?}", inputs.parameters_used);
///     Ok(())
/// }
/// ```
pub mod fmp {
    pub use marketflow_fmp::*;
}

// ============================================================================
// Batch
// ============================================================================

/// Concurrent batch valuation and persistence.
pub mod batch {
    pub use marketflow_batch::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use marketflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{BatchConfig, BatchRunner, JsonDirStore, ResultStore};
    pub use crate::{
        DcfModel, DiscountRate, GrowthSchedule, InputSource, Recommendation, Result,
        StaticInputSource, ValuationError, ValuationInputs, ValuationResult,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_classify_re_export() {
        assert_eq!(classify(Some(35.0)), Recommendation::Buy);
        assert_eq!(classify(None), Recommendation::Avoid);
    }

    #[tokio::test]
    async fn test_end_to_end_batch() {
        let source: StaticInputSource = [
            ValuationInputs::new("AAA", 10.0, 1_000.0, 50_000.0),
            ValuationInputs::new("BBB", 10.0, 1_000.0, 50_000.0).with_terminal_growth(0.2),
        ]
        .into_iter()
        .collect();

        let report = BatchRunner::new(source, BatchConfig::default())
            .run(&["AAA", "BBB"])
            .await;

        let records = report.records();
        assert_eq!(records["AAA"].ticker, "AAA");
        assert!(report.errors.contains_key("BBB"));
    }
}
