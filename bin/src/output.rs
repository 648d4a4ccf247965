//! Terminal rendering shared by the subcommands.

use anyhow::Result;
use clap::ValueEnum;
use marketflow_batch::BatchReport;
use marketflow_core::{ValuationResult, projection_frame};
use marketflow_dcf::SensitivityMatrix;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Tables for a terminal.
    #[default]
    Text,
    /// Pretty-printed JSON on stdout.
    Json,
}

const BOX_WIDTH: usize = 62;

pub(crate) fn header(title: &str) {
    println!("\n╔{}╗", "═".repeat(BOX_WIDTH));
    println!("║{:^BOX_WIDTH$}║", title);
    println!("╚{}╝\n", "═".repeat(BOX_WIDTH));
}

pub(crate) fn section(title: &str) {
    println!("{}", "━".repeat(BOX_WIDTH));
    println!("{title}");
    println!("{}\n", "━".repeat(BOX_WIDTH));
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// `+12.34%`, or `n/a` when upside is undefined.
pub(crate) fn upside(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |u| format!("{u:+.2}%"))
}

/// Compact money figure: `1.23B`, `456.70M`, `12.00K`.
pub(crate) fn money(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn print_valuation(result: &ValuationResult) -> Result<()> {
    let name = result.company_name.as_deref().unwrap_or("");
    println!("Ticker:            {} {}", result.ticker, name);
    println!("Price:             {:.2}", result.price);
    println!("Intrinsic value:   {:.2}", result.intrinsic_value);
    println!("Upside:            {}", upside(result.upside));
    println!("Recommendation:    {}", result.recommendation);
    println!();

    let coc = &result.cost_of_capital;
    println!("WACC:              {}", pct(coc.wacc));
    if let Some(ke) = coc.cost_of_equity {
        println!("  cost of equity:  {}", pct(ke));
    }
    if let Some(kd) = coc.after_tax_cost_of_debt {
        println!("  cost of debt:    {} (after tax)", pct(kd));
    }
    if let (Some(wd), Some(we)) = (coc.debt_weight, coc.equity_weight) {
        println!("  weights:         {} debt / {} equity", pct(wd), pct(we));
    }
    println!("Revenue growth:    {} (compound)", pct(result.revenue_growth));
    println!("Terminal growth:   {}", pct(result.terminal_growth));
    println!("EBITDA margin:     {}", pct(result.ebitda_margin));
    println!();

    section("PROJECTION");
    println!("{}", projection_frame(&result.projection)?);
    println!();

    println!("PV of cash flows:  {}", money(result.pv_of_cash_flows()));
    println!("Terminal value:    {}", money(result.terminal_value));
    println!("PV of terminal:    {}", money(result.terminal_value_pv));
    if let Some(share) = result.terminal_value_share() {
        println!("  share of EV:     {}", pct(share));
    }
    println!("Enterprise value:  {}", money(result.enterprise_value));
    println!("Net debt:          {}", money(result.net_debt));
    println!("Equity value:      {}", money(result.equity_value));
    println!("Shares:            {}", money(result.shares_outstanding));
    println!();
    Ok(())
}

pub(crate) fn print_sensitivity(matrix: &SensitivityMatrix) {
    section("SENSITIVITY (intrinsic value per share)");

    print!("{:>12}", "WACC \\ g");
    for g in &matrix.growth_values {
        print!("{:>12}", pct(*g));
    }
    println!();
    println!("{}", "─".repeat(12 * (matrix.growth_values.len() + 1)));

    for (i, wacc) in matrix.wacc_values.iter().enumerate() {
        print!("{:>12}", pct(*wacc));
        for j in 0..matrix.growth_values.len() {
            match matrix.get(i, j) {
                Some(v) if v.is_finite() => print!("{v:>12.2}"),
                _ => print!("{:>12}", "-"),
            }
        }
        println!();
    }
    println!();
}

pub(crate) fn print_report(report: &BatchReport) {
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:<11} {:>8} {:>9}",
        "Ticker", "Price", "Intrinsic", "Upside", "Rec", "WACC", "Growth"
    );
    println!("{}", "─".repeat(72));

    for record in report.records().values() {
        println!(
            "{:<8} {:>10.2} {:>10.2} {:>10} {:<11} {:>8} {:>9}",
            record.ticker,
            record.price,
            record.intrinsic,
            upside(record.upside),
            record.recommendation.as_str(),
            pct(record.wacc),
            pct(record.rev_growth),
        );
    }
    println!();

    if report.errors.is_empty() {
        println!("Errors: none");
    } else {
        println!("Errors:");
        for (ticker, message) in &report.errors {
            println!("  {ticker:<8} {message}");
        }
    }
    println!();
}
