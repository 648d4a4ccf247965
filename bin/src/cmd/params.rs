//! Params command implementation.
//!
//! Shows the inputs estimated for a ticker before any valuation runs.

use crate::{
    config::AppConfig,
    data,
    output::{self, OutputFormat},
};
use anyhow::{Context, Result};
use marketflow_core::{CapitalCosts, DiscountRate, GrowthSchedule, Reinvestment};
use marketflow_fmp::estimate_inputs;

/// Print the estimated inputs for a ticker.
pub(crate) async fn show_params(config: &AppConfig, ticker: &str, format: OutputFormat) -> Result<()> {
    let source = data::fmp_source(config)?;
    let raw = source
        .fetch_data(ticker)
        .await
        .with_context(|| format!("fetching data for {ticker}"))?;
    let inputs = estimate_inputs(&raw, source.config())?;

    if format == OutputFormat::Json {
        return output::print_json(&inputs);
    }

    output::header("Estimated Inputs");
    let name = inputs.company_name.as_deref().unwrap_or("");
    println!("Ticker:            {} {}", inputs.ticker, name);
    println!("Price:             {:.2}", inputs.price);
    println!("Shares:            {}", output::money(inputs.shares_outstanding));
    println!("Revenue:           {}", output::money(inputs.revenue));
    println!("Net debt:          {}", output::money(inputs.net_debt));
    println!("Horizon:           {} years", inputs.horizon);
    match &inputs.revenue_growth {
        GrowthSchedule::Flat(g) => println!("Revenue growth:    {:.2}% per year", g * 100.0),
        GrowthSchedule::PerYear(rates) => {
            let rates: Vec<String> = rates.iter().map(|g| format!("{:.2}%", g * 100.0)).collect();
            println!("Revenue growth:    {}", rates.join(", "));
        }
    }
    println!("EBITDA margin:     {:.2}%", inputs.ebitda_margin * 100.0);
    println!("EBIT margin:       {:.2}%", inputs.ebit_margin * 100.0);
    println!("Tax rate:          {:.2}%", inputs.tax_rate * 100.0);
    print_reinvestment(&inputs.reinvestment);
    print_discount(&inputs.discount);
    println!("Terminal growth:   {:.2}%", inputs.terminal_growth * 100.0);
    println!();

    output::section("PARAMETERS USED");
    for (key, value) in &inputs.parameters_used {
        println!("  {key:<28} {value}");
    }
    println!();
    Ok(())
}

fn print_reinvestment(r: &Reinvestment) {
    println!("Capex:             {:.2}% of revenue", r.capex_pct * 100.0);
    match r.depreciation_pct {
        Some(d) => println!("D&A:               {:.2}% of revenue", d * 100.0),
        None => println!("D&A:               EBITDA - EBIT"),
    }
    println!("Working capital:   {:.2}% of revenue change", r.working_capital_pct * 100.0);
}

fn print_discount(discount: &DiscountRate) {
    match discount {
        DiscountRate::Wacc(w) => println!("WACC:              {:.2}% (given)", w * 100.0),
        DiscountRate::Derived(CapitalCosts {
            risk_free_rate,
            beta,
            equity_risk_premium,
            cost_of_debt,
            debt_weight,
            equity_weight,
        }) => {
            println!("WACC inputs:");
            println!("  risk-free rate:  {:.2}%", risk_free_rate * 100.0);
            println!("  beta:            {beta:.2}");
            println!("  equity premium:  {:.2}%", equity_risk_premium * 100.0);
            println!("  cost of debt:    {:.2}% (pre tax)", cost_of_debt * 100.0);
            println!(
                "  weights:         {:.2}% debt / {:.2}% equity",
                debt_weight * 100.0,
                equity_weight * 100.0
            );
        }
    }
}
