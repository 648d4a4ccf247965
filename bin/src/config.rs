//! Application configuration.
//!
//! Loaded from a TOML file: `--config <PATH>` when given, otherwise
//! `marketflow.toml` in the working directory if it exists, otherwise
//! defaults. Every field is optional.
//!
//! ```toml
//! tickers = ["AAPL", "MSFT"]
//! max_concurrency = 4
//! history_periods = 5
//! risk_free_rate = 0.045
//! horizon = 5
//! default_country = "United States"
//! working_capital_pct = 0.0
//! terminal_growth = 0.025
//! store_path = "data"
//! ```

use anyhow::{Context, Result, bail};
use marketflow_batch::{BatchConfig, DEFAULT_MAX_CONCURRENCY};
use marketflow_core::MAX_HORIZON;
use marketflow_dcf::country::DEFAULT_COUNTRY;
use marketflow_fmp::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "marketflow.toml";

/// Tickers valued by `batch` when neither the config nor `--tickers` name any.
pub(crate) const DEFAULT_TICKERS: &[&str] = &[
    "HOOD", "IREN", "AMZN", "NVDA", "TSM", "NFLX", "MU", "AAPL", "MSFT", "GOOGL", "META", "AVGO",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) tickers: Vec<String>,
    pub(crate) max_concurrency: usize,
    pub(crate) history_periods: u32,
    pub(crate) risk_free_rate: f64,
    pub(crate) horizon: usize,
    pub(crate) default_country: String,
    pub(crate) working_capital_pct: f64,
    pub(crate) terminal_growth: Option<f64>,
    pub(crate) store_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let source = SourceConfig::default();
        Self {
            tickers: DEFAULT_TICKERS.iter().map(ToString::to_string).collect(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            history_periods: source.history_periods,
            risk_free_rate: source.risk_free_rate,
            horizon: source.horizon,
            default_country: DEFAULT_COUNTRY.to_string(),
            working_capital_pct: source.working_capital_pct,
            terminal_growth: None,
            store_path: PathBuf::from("data"),
        }
    }
}

impl AppConfig {
    /// Resolve and load the configuration.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in config {}", path.display()))
    }

    pub(crate) fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("TOML parsing error")?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be at least 1");
        }
        if !(1..=MAX_HORIZON).contains(&self.horizon) {
            bail!("horizon must be between 1 and {MAX_HORIZON} years, got {}", self.horizon);
        }
        if self.history_periods == 0 {
            bail!("history_periods must be at least 1");
        }
        if !self.risk_free_rate.is_finite() || self.risk_free_rate <= -1.0 || self.risk_free_rate >= 1.0 {
            bail!("risk_free_rate must be a decimal rate, got {}", self.risk_free_rate);
        }
        if !(-1.0..=1.0).contains(&self.working_capital_pct) {
            bail!(
                "working_capital_pct must lie in [-1, 1], got {}",
                self.working_capital_pct
            );
        }
        if let Some(g) = self.terminal_growth
            && !g.is_finite()
        {
            bail!("terminal_growth must be finite");
        }
        Ok(())
    }

    pub(crate) fn source_config(&self) -> SourceConfig {
        SourceConfig {
            history_periods: self.history_periods,
            risk_free_rate: self.risk_free_rate,
            horizon: self.horizon,
            working_capital_pct: self.working_capital_pct,
            terminal_growth: self.terminal_growth,
            default_country: self.default_country.clone(),
        }
    }

    pub(crate) const fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_concurrency: self.max_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tickers.len(), 12);
        assert_eq!(config.tickers[0], "HOOD");
        assert_eq!(config.horizon, 5);
        assert_eq!(config.source_config(), SourceConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            tickers = ["AAPL", "MSFT"]
            max_concurrency = 2
            terminal_growth = 0.02
            "#,
        )
        .unwrap();

        assert_eq!(config.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(config.batch_config().max_concurrency, 2);
        assert_eq!(config.source_config().terminal_growth, Some(0.02));
        assert_eq!(config.history_periods, 5);
        assert_eq!(config.store_path, PathBuf::from("data"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AppConfig::from_toml_str("max_concurrency = 0").is_err());
        assert!(AppConfig::from_toml_str("horizon = 0").is_err());
        assert!(AppConfig::from_toml_str("horizon = 101").is_err());
        assert!(AppConfig::from_toml_str("working_capital_pct = 2.0").is_err());
        assert!(AppConfig::from_toml_str("risk_free_rate = 4.5").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(AppConfig::from_toml_str("tickrs = [\"AAPL\"]").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_country = \"Japan\"\nstore_path = \"out\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_country, "Japan");
        assert_eq!(config.store_path, PathBuf::from("out"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
