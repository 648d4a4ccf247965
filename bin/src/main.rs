//! marketflow CLI binary.
//!
//! Command-line interface for the marketflow DCF valuation engine.

mod cmd;
mod config;
mod data;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::AppConfig;
use logging::LogFormat;
use output::OutputFormat;
use std::{path::PathBuf, process};

#[derive(Debug, Parser)]
#[command(name = "marketflow")]
#[command(about = "Discounted cash flow valuations for equities", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./marketflow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Value one ticker from FMP data
    Value {
        /// Ticker symbol
        ticker: String,

        /// Show the WACC × terminal growth sensitivity grid
        #[arg(short, long)]
        sensitivity: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Value a list of tickers and save the results
    Batch {
        /// Ticker symbols (defaults to the configured list)
        #[arg(short, long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Output directory (defaults to the configured store path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Value inputs read from a JSON file
    Compute {
        /// JSON file holding one inputs object or an array of them
        inputs: PathBuf,

        /// Show the sensitivity grid (single inputs object only)
        #[arg(short, long)]
        sensitivity: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the inputs estimated for a ticker
    Params {
        /// Ticker symbol
        ticker: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Classify an upside percentage
    Classify {
        /// Upside in percent, e.g. 35 or -12.5
        #[arg(allow_negative_numbers = true)]
        upside: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List country risk premiums and growth estimates
    Countries {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Value {
            ticker,
            sensitivity,
            format,
        } => {
            cmd::value::value_ticker(&config, &ticker, sensitivity, format).await?;
        }
        Commands::Batch {
            tickers,
            out,
            format,
        } => {
            cmd::batch::run_batch(&config, tickers, out, format).await?;
        }
        Commands::Compute {
            inputs,
            sensitivity,
            format,
        } => {
            cmd::compute::compute_inputs(&config, &inputs, sensitivity, format).await?;
        }
        Commands::Params { ticker, format } => {
            cmd::params::show_params(&config, &ticker, format).await?;
        }
        Commands::Classify { upside, format } => {
            cmd::classify::classify_upside(upside, format)?;
        }
        Commands::Countries { format } => {
            cmd::countries::list_countries(format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_batch_tickers_split_on_commas() {
        let cli = Cli::try_parse_from(["marketflow", "batch", "--tickers", "AAPL,msft", "--out", "tmp"]).unwrap();
        match cli.command {
            Commands::Batch { tickers, out, format } => {
                assert_eq!(tickers, vec!["AAPL", "msft"]);
                assert_eq!(out, Some(PathBuf::from("tmp")));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_classify_accepts_negative_upside() {
        let cli = Cli::try_parse_from(["marketflow", "classify", "-35.5"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { upside, .. } if upside == -35.5));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "marketflow",
            "value",
            "NVDA",
            "--sensitivity",
            "--format",
            "json",
            "-v",
            "--log-format",
            "json",
            "--config",
            "alt.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        match cli.command {
            Commands::Value {
                ticker,
                sensitivity,
                format,
            } => {
                assert_eq!(ticker, "NVDA");
                assert!(sensitivity);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["marketflow", "countries", "--format", "xml"]).is_err());
    }
}
