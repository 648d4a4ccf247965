//! Financial Modeling Prep (FMP) API client for marketflow.
//!
//! This crate fetches company profiles, quotes and annual statements from
//! the [Financial Modeling Prep](https://financialmodelingprep.com/) API and
//! turns them into [`ValuationInputs`](marketflow_core::ValuationInputs)
//! through [`FmpInputSource`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use marketflow_core::InputSource;
//! use marketflow_fmp::{FmpInputSource, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FmpInputSource::from_env(SourceConfig::default())?;
//!
//!     let inputs = source.fetch_inputs("AAPL").await?;
//!     println!("{inputs:#?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod source;
mod types;

pub use client::{FmpClient, REQUEST_TIMEOUT};
pub use error::FmpError;
pub use source::{FmpInputSource, SourceConfig, estimate_inputs};
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
