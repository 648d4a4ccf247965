//! Persisting batch outcomes.
//!
//! [`JsonDirStore`] lays results out as
//!
//! ```text
//! <root>/dcf_results/<TICKER>.json                         latest, overwritten
//! <root>/dcf_results/<TICKER>/snapshots/<YYYY-MM-DD>.json  one per run date
//! <root>/meta/last_run.json                                run summary
//! ```

use crate::report::BatchReport;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// Errors raised while persisting results.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure.
    #[error("Failed to serialize {what}: {source}")]
    Json {
        /// What was being serialized.
        what: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A ticker or date that cannot be used as a single path component.
    #[error("Invalid path component {0:?}")]
    InvalidComponent(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Destination for batch outcomes.
pub trait ResultStore {
    /// Persist every record plus the run summary.
    ///
    /// Returns the number of ticker records written.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    fn save(&self, report: &BatchReport) -> StoreResult<usize>;
}

/// Stores outcomes as pretty-printed JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Create a store rooted at `root`. Nothing is touched until [`save`](ResultStore::save).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a ticker's latest record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidComponent`] if the ticker would leave
    /// the `dcf_results` directory.
    pub fn latest_path(&self, ticker: &str) -> StoreResult<PathBuf> {
        let ticker = path_component(ticker)?;
        Ok(self.root.join("dcf_results").join(format!("{ticker}.json")))
    }

    /// Path of a ticker's snapshot for `date` (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidComponent`] if the ticker or date is not
    /// a plain file name.
    pub fn snapshot_path(&self, ticker: &str, date: &str) -> StoreResult<PathBuf> {
        Ok(self
            .root
            .join("dcf_results")
            .join(path_component(ticker)?)
            .join("snapshots")
            .join(format!("{}.json", path_component(date)?)))
    }

    /// Path of the run summary.
    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.root.join("meta").join("last_run.json")
    }
}

/// A ticker or date accepted only as one plain path component.
fn path_component(name: &str) -> StoreResult<&str> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..");
    if plain {
        Ok(name)
    } else {
        Err(StoreError::InvalidComponent(name.to_string()))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        what: what.to_string(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote {what}");
    Ok(())
}

impl ResultStore for JsonDirStore {
    fn save(&self, report: &BatchReport) -> StoreResult<usize> {
        let summary = report.summary();
        let records = report.records();

        // Resolve every path before the first write so a bad ticker leaves
        // the store untouched.
        let mut planned = Vec::with_capacity(records.len());
        for (ticker, record) in &records {
            let latest = self.latest_path(ticker)?;
            let snapshot = self.snapshot_path(ticker, &summary.date)?;
            planned.push((ticker, record, latest, snapshot));
        }

        let mut count = 0;
        for (ticker, record, latest, snapshot) in planned {
            write_json(&latest, record, ticker)?;
            write_json(&snapshot, record, ticker)?;
            count += 1;
        }

        write_json(&self.summary_path(), &summary, "run summary")?;
        Ok(count)
    }
}
