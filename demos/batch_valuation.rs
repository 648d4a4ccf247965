//! Offline Batch Valuation
//!
//! Values a small hand-built universe with the concurrent batch runner and
//! prints the per-ticker records plus a sensitivity grid for one of them.
//! No API key needed.
//!
//! ## Running
//!
//! ```bash
//! cargo run --release -p marketflow-demos --example batch_valuation
//! ```

use marketflow::prelude::*;
use marketflow::{CapitalCosts, Reinvestment, SensitivityConfig, sensitivity};

fn universe() -> Vec<ValuationInputs> {
    vec![
        // Mature cash generator with a derived WACC.
        ValuationInputs::new("STEADY", 120.0, 2.0e9, 80.0e9)
            .with_company_name("Steady Industries")
            .with_growth(GrowthSchedule::Flat(0.04))
            .with_margins(0.32, 0.25)
            .with_reinvestment(Reinvestment {
                depreciation_pct: Some(0.05),
                capex_pct: 0.06,
                working_capital_pct: 0.02,
            })
            .with_discount(DiscountRate::Derived(CapitalCosts {
                beta: 0.9,
                ..CapitalCosts::default()
            }))
            .with_terminal_growth(0.025)
            .with_net_debt(15.0e9),
        // Fast grower, fading growth path.
        ValuationInputs::new("ROCKET", 85.0, 500.0e6, 6.0e9)
            .with_company_name("Rocket Software")
            .with_growth(GrowthSchedule::PerYear(vec![0.35, 0.28, 0.22, 0.16, 0.10]))
            .with_margins(0.22, 0.15)
            .with_discount(DiscountRate::Wacc(0.11))
            .with_terminal_growth(0.03)
            .with_net_debt(-1.2e9),
        // Terminal growth above WACC; reported as an error.
        ValuationInputs::new("BROKEN", 10.0, 1.0e6, 50.0e6)
            .with_discount(DiscountRate::Wacc(0.05))
            .with_terminal_growth(0.06),
    ]
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let source: StaticInputSource = universe().into_iter().collect();
    let tickers = source.tickers();

    let runner = BatchRunner::new(source, BatchConfig { max_concurrency: 2 });
    let report = runner.run(&tickers).await;

    println!("\n{:<8} {:>10} {:>10} {:>9}  {}", "Ticker", "Price", "Intrinsic", "Upside", "Rec");
    println!("{}", "-".repeat(52));
    for record in report.records().values() {
        let upside = record
            .upside
            .map_or_else(|| "n/a".to_string(), |u| format!("{u:+.1}%"));
        println!(
            "{:<8} {:>10.2} {:>10.2} {:>9}  {}",
            record.ticker, record.price, record.intrinsic, upside, record.recommendation
        );
    }
    for (ticker, error) in &report.errors {
        println!("{ticker:<8} error: {error}");
    }

    if let Some(result) = report.results.get("ROCKET") {
        let grid = sensitivity(result, &SensitivityConfig::default())?;
        println!("\nROCKET intrinsic value by WACC (rows) and terminal growth (columns):");
        print!("{:>8}", "");
        for g in &grid.growth_values {
            print!("{:>10.1}%", g * 100.0);
        }
        println!();
        for (i, wacc) in grid.wacc_values.iter().enumerate() {
            print!("{:>7.1}%", wacc * 100.0);
            for j in 0..grid.growth_values.len() {
                print!("{:>11.2}", grid.get(i, j).unwrap_or(f64::NAN));
            }
            println!();
        }
    }

    println!();
    Ok(())
}
