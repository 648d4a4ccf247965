//! Concurrent batch valuation.
//!
//! Each ticker is fetched and valued in its own tokio task. A semaphore caps
//! how many run at once; a failed or panicked task only fills that ticker's
//! error slot.

use crate::report::BatchReport;
use chrono::{DateTime, Utc};
use marketflow_core::{InputSource, Result, Ticker, ValuationError, ValuationResult};
use marketflow_dcf::DcfModel;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, warn};

/// Tasks allowed in flight when not configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Batch runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum tickers fetched and valued at once (at least 1).
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Upper-case, trim and de-duplicate tickers, keeping first-seen order.
#[must_use]
pub fn normalize_tickers<T: AsRef<str>>(tickers: &[T]) -> Vec<Ticker> {
    let mut seen = std::collections::HashSet::new();
    tickers
        .iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Values many tickers concurrently against one [`InputSource`].
///
/// # Example
///
/// ```
/// use marketflow_batch::{BatchConfig, BatchRunner};
/// use marketflow_core::{StaticInputSource, ValuationInputs};
///
/// let source: StaticInputSource = [ValuationInputs::new("ACME", 10.0, 1_000.0, 50_000.0)]
///     .into_iter()
///     .collect();
/// let runner = BatchRunner::new(source, BatchConfig::default());
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let report = rt.block_on(runner.run(&["ACME", "NOPE"]));
/// assert_eq!(report.summary().total_success, 1);
/// assert_eq!(report.summary().total_errors, 1);
/// ```
#[derive(Debug)]
pub struct BatchRunner<S> {
    source: Arc<S>,
    model: DcfModel,
    config: BatchConfig,
}

impl<S: InputSource + 'static> BatchRunner<S> {
    /// Create a runner over `source` with the default model.
    #[must_use]
    pub fn new(source: S, config: BatchConfig) -> Self {
        Self::from_arc(Arc::new(source), config)
    }

    /// Create a runner over a shared source.
    #[must_use]
    pub fn from_arc(source: Arc<S>, config: BatchConfig) -> Self {
        Self {
            source,
            model: DcfModel::default(),
            config,
        }
    }

    /// Replace the valuation model.
    #[must_use]
    pub fn with_model(mut self, model: DcfModel) -> Self {
        self.model = model;
        self
    }

    /// The input source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runner settings.
    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Value every ticker, timestamped now.
    pub async fn run<T: AsRef<str>>(&self, tickers: &[T]) -> BatchReport {
        self.run_at(tickers, Utc::now()).await
    }

    /// Value every ticker with an explicit run timestamp.
    ///
    /// Tickers are normalized first; duplicates are valued once.
    pub async fn run_at<T: AsRef<str>>(&self, tickers: &[T], run_at: DateTime<Utc>) -> BatchReport {
        let tickers = normalize_tickers(tickers);
        let concurrency = self.config.max_concurrency.max(1);
        info!(
            source = self.source.name(),
            tickers = tickers.len(),
            concurrency,
            "starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks: JoinSet<(Ticker, Result<ValuationResult>)> = JoinSet::new();
        let mut pending = HashMap::with_capacity(tickers.len());

        for ticker in tickers {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let model = self.model.clone();
            let task_ticker = ticker.clone();

            let handle = tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => value_one(source.as_ref(), &model, &task_ticker, run_at).await,
                    Err(e) => Err(ValuationError::Other(e.to_string())),
                };
                (task_ticker, outcome)
            });
            pending.insert(handle.id(), ticker);
        }

        let mut report = BatchReport::new(run_at);
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, (ticker, outcome))) => {
                    pending.remove(&id);
                    match outcome {
                        Ok(result) => {
                            debug!(
                                ticker = %ticker,
                                intrinsic = result.intrinsic_value,
                                recommendation = %result.recommendation,
                                "valued"
                            );
                            report.insert_result(result);
                        }
                        Err(e) => {
                            warn!(ticker = %ticker, error = %e, "valuation failed");
                            report.insert_error(ticker, e.to_string());
                        }
                    }
                }
                Err(join_err) => {
                    let Some(ticker) = pending.remove(&join_err.id()) else {
                        warn!(error = %join_err, "task for unknown ticker failed");
                        continue;
                    };
                    let message = if join_err.is_panic() {
                        "valuation task panicked".to_string()
                    } else {
                        "valuation task cancelled".to_string()
                    };
                    warn!(ticker = %ticker, "{message}");
                    report.insert_error(ticker, message);
                }
            }
        }

        let summary = report.summary();
        info!(
            total_success = summary.total_success,
            total_errors = summary.total_errors,
            "batch complete"
        );
        report
    }
}

async fn value_one<S: InputSource>(
    source: &S,
    model: &DcfModel,
    ticker: &str,
    run_at: DateTime<Utc>,
) -> Result<ValuationResult> {
    let inputs = source.fetch_inputs(ticker).await?;
    model.value_at(&inputs, run_at)
}
