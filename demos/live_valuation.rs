//! Live Valuation
//!
//! Fetches statements for a few tickers from Financial Modeling Prep,
//! estimates DCF inputs and values them.
//!
//! ## Prerequisites
//!
//! Set your FMP API key in the environment or `.env` file:
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo run --release -p marketflow-demos --example live_valuation
//! ```

use marketflow::fmp::{FmpError, FmpInputSource, SourceConfig};
use marketflow::prelude::*;

const TICKERS: &[&str] = &["AAPL", "MSFT", "NVDA"];

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let source = match FmpInputSource::from_env(SourceConfig::default()) {
        Ok(s) => s,
        Err(FmpError::MissingApiKey) => {
            eprintln!("Error: FMP_API_KEY not set.");
            eprintln!("\nTo run this example:");
            eprintln!("  1. Get a free API key at https://financialmodelingprep.com/");
            eprintln!("  2. Create a .env file with: FMP_API_KEY=your_key_here");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let report = BatchRunner::new(source, BatchConfig::default())
        .run(TICKERS)
        .await;

    for (ticker, result) in &report.results {
        println!(
            "{ticker:<6} price {:>9.2}  intrinsic {:>9.2}  WACC {:>5.2}%  growth {:>6.2}%  {}",
            result.price,
            result.intrinsic_value,
            result.wacc() * 100.0,
            result.revenue_growth * 100.0,
            result.recommendation,
        );
    }
    for (ticker, error) in &report.errors {
        println!("{ticker:<6} error: {error}");
    }

    Ok(())
}
