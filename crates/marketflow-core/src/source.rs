//! Input sources for valuations.
//!
//! An [`InputSource`] turns a ticker into [`ValuationInputs`]. The batch
//! runner is generic over it, so the same pipeline runs against the market
//! data API, a JSON file, or an in-memory fixture.

use crate::{Result, Ticker, ValuationError, ValuationInputs};
use std::collections::HashMap;
use std::future::Future;

/// Provides valuation inputs per ticker.
///
/// Implementations must be thread-safe (`Send + Sync`) so a batch can
/// fetch several tickers concurrently.
///
/// # Example
///
/// ```no_run
/// use marketflow_core::{InputSource, Result, ValuationInputs};
///
/// struct Fixed;
///
/// impl InputSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     async fn fetch_inputs(&self, ticker: &str) -> Result<ValuationInputs> {
///         Ok(ValuationInputs::new(ticker, 10.0, 1_000.0, 50_000.0))
///     }
/// }
/// ```
pub trait InputSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch or build the inputs for one ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker is unknown, the data cannot be fetched,
    /// or a required field is missing.
    fn fetch_inputs(&self, ticker: &str) -> impl Future<Output = Result<ValuationInputs>> + Send;
}

/// In-memory input source keyed by upper-case ticker.
///
/// Collecting with [`FromIterator`] keeps the last inputs seen for a
/// ticker; [`StaticInputSource::try_from_inputs`] rejects duplicates.
#[derive(Debug, Clone, Default)]
pub struct StaticInputSource {
    inputs: HashMap<Ticker, ValuationInputs>,
}

impl StaticInputSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from inputs whose tickers must be distinct once
    /// normalized.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] naming the first ticker that
    /// appears twice.
    pub fn try_from_inputs<I: IntoIterator<Item = ValuationInputs>>(iter: I) -> Result<Self> {
        let mut source = Self::new();
        for inputs in iter {
            if let Some(previous) = source.insert(inputs) {
                return Err(ValuationError::invalid(format!(
                    "duplicate inputs for ticker {}",
                    previous.ticker
                )));
            }
        }
        Ok(source)
    }

    /// Add or replace the inputs for their ticker, normalizing it to
    /// trimmed upper case. Returns the inputs that were replaced, if any.
    pub fn insert(&mut self, mut inputs: ValuationInputs) -> Option<ValuationInputs> {
        inputs.ticker = inputs.ticker.trim().to_uppercase();
        self.inputs.insert(inputs.ticker.clone(), inputs)
    }

    /// Tickers known to this source, sorted.
    #[must_use]
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = self.inputs.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Number of tickers held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the source holds no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl FromIterator<ValuationInputs> for StaticInputSource {
    fn from_iter<I: IntoIterator<Item = ValuationInputs>>(iter: I) -> Self {
        let mut source = Self::new();
        for inputs in iter {
            source.insert(inputs);
        }
        source
    }
}

impl InputSource for StaticInputSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_inputs(&self, ticker: &str) -> Result<ValuationInputs> {
        self.inputs
            .get(&ticker.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| ValuationError::TickerNotFound(ticker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_lookup() {
        let source: StaticInputSource = [
            ValuationInputs::new("aapl", 200.0, 1.5e10, 3.9e11),
            ValuationInputs::new("msft", 400.0, 7.4e9, 2.4e11),
        ]
        .into_iter()
        .collect();

        assert_eq!(source.len(), 2);
        assert_eq!(source.tickers(), vec!["AAPL", "MSFT"]);

        let inputs = source.fetch_inputs("aapl").await.unwrap();
        assert_eq!(inputs.ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_static_source_missing() {
        let source = StaticInputSource::new();
        assert!(source.is_empty());

        let err = source.fetch_inputs("NOPE").await.unwrap_err();
        assert!(matches!(err, ValuationError::TickerNotFound(t) if t == "NOPE"));
    }

    #[test]
    fn test_duplicate_tickers() {
        let inputs = || {
            [
                ValuationInputs::new("aapl", 200.0, 1.5e10, 3.9e11),
                ValuationInputs::new(" AAPL ", 210.0, 1.5e10, 3.9e11),
            ]
        };

        let err = StaticInputSource::try_from_inputs(inputs()).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(ref m) if m.contains("AAPL")));

        let mut source = StaticInputSource::new();
        assert!(source.insert(ValuationInputs::new("msft", 400.0, 7.4e9, 2.4e11)).is_none());
        let replaced = source.insert(ValuationInputs::new("MSFT", 410.0, 7.4e9, 2.4e11));
        assert_eq!(replaced.map(|i| i.price), Some(400.0));

        let last_wins: StaticInputSource = inputs().into_iter().collect();
        assert_eq!(last_wins.len(), 1);
    }

    #[test]
    fn test_static_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticInputSource>();
    }
}
