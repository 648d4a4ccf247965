#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/marketflow/marketflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the marketflow DCF valuation engine.
//!
//! This crate holds the data model shared by the computation, the input
//! sources and the batch runner: what goes into a valuation, what comes out,
//! and the error type every step reports.

/// The version of the marketflow-core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod frame;
pub mod result;
pub mod source;
pub mod types;

// Re-exports
pub use error::{Result, ValuationError};
pub use frame::{projection_frame, records_frame};
pub use result::{
    CostOfCapital, ProjectionRow, Recommendation, ValuationRecord, ValuationResult, round_to,
};
pub use source::{InputSource, StaticInputSource};
pub use types::{
    CapitalCosts, DEFAULT_HORIZON, DiscountRate, GrowthSchedule, MAX_HORIZON, Parameters,
    Reinvestment, Ticker, ValuationInputs,
};
