//! Batch outcomes and the run summary derived from them.

use chrono::{DateTime, SecondsFormat, Utc};
use marketflow_core::{Result, Ticker, ValuationRecord, ValuationResult, records_frame};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one batch run: a result or an error message per ticker.
///
/// A ticker appears in exactly one of the two maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the run started.
    pub run_at: DateTime<Utc>,
    /// Successful valuations keyed by ticker.
    pub results: BTreeMap<Ticker, ValuationResult>,
    /// Failure messages keyed by ticker.
    pub errors: BTreeMap<Ticker, String>,
}

impl BatchReport {
    /// Empty report stamped with `run_at`.
    #[must_use]
    pub const fn new(run_at: DateTime<Utc>) -> Self {
        Self {
            run_at,
            results: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Record a successful valuation, clearing any earlier error for it.
    pub fn insert_result(&mut self, result: ValuationResult) {
        self.errors.remove(&result.ticker);
        self.results.insert(result.ticker.clone(), result);
    }

    /// Record a failure, clearing any earlier result for it.
    pub fn insert_error(&mut self, ticker: impl Into<Ticker>, message: impl Into<String>) {
        let ticker = ticker.into();
        self.results.remove(&ticker);
        self.errors.insert(ticker, message.into());
    }

    /// Number of tickers attempted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    /// Whether no ticker was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Output records keyed by ticker.
    #[must_use]
    pub fn records(&self) -> BTreeMap<Ticker, ValuationRecord> {
        self.results
            .iter()
            .map(|(ticker, result)| (ticker.clone(), result.to_record()))
            .collect()
    }

    /// The `{"results": …, "errors": …}` view written by `--format json`.
    #[must_use]
    pub fn to_output(&self) -> BatchOutput {
        BatchOutput {
            results: self.records(),
            errors: self.errors.clone(),
        }
    }

    /// Records as a DataFrame, ordered by ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be built.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let records: Vec<ValuationRecord> = self.records().into_values().collect();
        records_frame(&records)
    }

    /// Summary of the run.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            timestamp: self.run_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            date: self.run_at.format("%Y-%m-%d").to_string(),
            tickers_processed: self.results.keys().cloned().collect(),
            tickers_failed: self.errors.clone(),
            total_success: self.results.len(),
            total_errors: self.errors.len(),
        }
    }
}

/// Serializable batch output: records and errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Output records keyed by ticker.
    pub results: BTreeMap<Ticker, ValuationRecord>,
    /// Failure messages keyed by ticker.
    pub errors: BTreeMap<Ticker, String>,
}

/// The "last run" record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run start, RFC 3339 UTC.
    pub timestamp: String,
    /// Run date, `YYYY-MM-DD`.
    pub date: String,
    /// Tickers that produced a record.
    pub tickers_processed: Vec<Ticker>,
    /// Failed tickers with their error message.
    pub tickers_failed: BTreeMap<Ticker, String>,
    /// Number of records produced.
    pub total_success: usize,
    /// Number of failed tickers.
    pub total_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use marketflow_core::ValuationInputs;
    use marketflow_dcf::DcfModel;

    fn run_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap()
    }

    fn result(ticker: &str) -> ValuationResult {
        let inputs = ValuationInputs::new(ticker, 20.0, 1_000.0, 100_000.0);
        DcfModel::default().value_at(&inputs, run_at()).unwrap()
    }

    #[test]
    fn test_summary() {
        let mut report = BatchReport::new(run_at());
        report.insert_result(result("MSFT"));
        report.insert_result(result("AAPL"));
        report.insert_error("BAD", "Ticker not found: BAD");

        let summary = report.summary();
        assert_eq!(summary.date, "2025-06-02");
        assert_eq!(summary.timestamp, "2025-06-02T15:00:00.000000+00:00");
        assert_eq!(summary.tickers_processed, vec!["AAPL", "MSFT"]);
        assert_eq!(summary.tickers_failed["BAD"], "Ticker not found: BAD");
        assert_eq!(summary.total_success, 2);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_ticker_in_one_map_only() {
        let mut report = BatchReport::new(run_at());
        report.insert_error("AAPL", "timeout");
        report.insert_result(result("AAPL"));
        assert!(report.errors.is_empty());
        assert_eq!(report.results.len(), 1);

        report.insert_error("AAPL", "timeout");
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_output_json_shape() {
        let mut report = BatchReport::new(run_at());
        report.insert_result(result("AAPL"));
        report.insert_error("BAD", "boom");

        let json = serde_json::to_value(report.to_output()).unwrap();
        assert_eq!(json["results"]["AAPL"]["ticker"], "AAPL");
        assert!(json["results"]["AAPL"]["updated_at"].is_string());
        assert_eq!(json["errors"]["BAD"], "boom");
    }

    #[test]
    fn test_frame() {
        let mut report = BatchReport::new(run_at());
        report.insert_result(result("MSFT"));
        report.insert_result(result("AAPL"));
        let frame = report.to_frame().unwrap();
        assert_eq!(frame.height(), 2);
    }
}
