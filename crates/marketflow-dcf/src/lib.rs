//! Discounted-cash-flow valuation for marketflow.
//!
//! This crate implements the valuation pipeline end to end:
//! - Projection: revenue growth, margins and the EBIT → UFCF bridge
//! - Discounting: per-year discount factors and present values
//! - Terminal value: Gordon growth, validated against the discount rate
//! - WACC: CAPM cost of equity and weighted after-tax cost of debt
//! - Aggregation and classification: per-share value, upside, recommendation
//! - Sensitivity: intrinsic value over a WACC × growth grid
//! - Assumptions: estimators over historical statements and country tables
//!
//! # Example
//!
//! ```rust,ignore
//! use marketflow_dcf::{DcfModel, SensitivityConfig, sensitivity};
//!
//! let result = DcfModel::default().value(&inputs)?;
//! let grid = sensitivity(&result, &SensitivityConfig::default())?;
//! println!("{} {:.2} ({})", result.ticker, result.intrinsic_value, result.recommendation);
//! ```

pub mod assumptions;
pub mod country;
pub mod discount;
pub mod projection;
pub mod recommendation;
pub mod sensitivity;
pub mod valuation;
pub mod wacc;

// Re-export main types
pub use discount::{TerminalValue, discount, discount_factor, terminal_value, validate_rates};
pub use projection::{CashFlowProjector, ProjectedYear, ProjectionConfig};
pub use recommendation::{classify, upside_pct};
pub use sensitivity::{SensitivityConfig, SensitivityMatrix, sensitivity};
pub use valuation::{Aggregate, DcfConfig, DcfModel, aggregate};
pub use wacc::{CapitalStructure, cost_of_equity, derive_wacc, resolve_discount_rate};
