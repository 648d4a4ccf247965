//! Error types for FMP API client.

use marketflow_core::ValuationError;
use thiserror::Error;

/// Errors that can occur when using the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed. The request URL is stripped since it carries
    /// the API key.
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No {what} available for {symbol}")]
    NoData {
        /// Which dataset came back empty.
        what: &'static str,
        /// Ticker symbol.
        symbol: String,
    },
}

impl From<reqwest::Error> for FmpError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

impl From<FmpError> for ValuationError {
    fn from(err: FmpError) -> Self {
        match err {
            FmpError::SymbolNotFound(symbol) => Self::TickerNotFound(symbol),
            FmpError::NoData { what, symbol } => Self::MissingInput(format!("no {what} for {symbol}")),
            other => Self::DataFetch(other.to_string()),
        }
    }
}
