//! Batch valuation for marketflow.
//!
//! - [`BatchRunner`]: values a list of tickers concurrently against any
//!   [`InputSource`](marketflow_core::InputSource)
//! - [`BatchReport`] / [`RunSummary`]: per-ticker outcomes and the
//!   "last run" record
//! - [`ResultStore`] / [`JsonDirStore`]: persistence of records, daily
//!   snapshots and the summary

pub mod report;
pub mod runner;
pub mod store;

pub use report::{BatchOutput, BatchReport, RunSummary};
pub use runner::{BatchConfig, BatchRunner, DEFAULT_MAX_CONCURRENCY, normalize_tickers};
pub use store::{JsonDirStore, ResultStore, StoreError, StoreResult};
