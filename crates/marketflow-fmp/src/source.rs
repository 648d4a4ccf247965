//! [`InputSource`] backed by the FMP API.
//!
//! Raw statements are turned into [`ValuationInputs`] by
//! [`estimate_inputs`], which is pure so the mapping can be tested without
//! the network.

use crate::{FmpClient, types::ValuationData};
use marketflow_core::{
    CapitalCosts, DiscountRate, GrowthSchedule, InputSource, Reinvestment, Result, ValuationError,
    ValuationInputs, round_to,
};
use marketflow_dcf::{
    CapitalStructure,
    assumptions::{
        average_ratio, capex_intensity, clamp_growth, ebit_margin, ebitda_margin, effective_tax_rate,
        implied_cost_of_debt, operating_cash_flow_margin, revenue_growth,
    },
    country::{DEFAULT_COUNTRY, equity_risk_premium, long_term_growth},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Market-wide assumptions applied to every ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Annual statements fetched per ticker.
    pub history_periods: u32,
    /// Risk-free rate for CAPM.
    pub risk_free_rate: f64,
    /// Forecast horizon in years.
    pub horizon: usize,
    /// Working capital as a fraction of revenue change.
    pub working_capital_pct: f64,
    /// Terminal growth override; the country's long-term growth otherwise.
    pub terminal_growth: Option<f64>,
    /// Country assumed when the profile has none.
    pub default_country: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            history_periods: 5,
            risk_free_rate: 0.045,
            horizon: marketflow_core::DEFAULT_HORIZON,
            working_capital_pct: 0.0,
            terminal_growth: None,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Builds valuation inputs from FMP data.
#[derive(Debug, Clone)]
pub struct FmpInputSource {
    client: FmpClient,
    config: SourceConfig,
}

impl FmpInputSource {
    /// Create a source over an existing client.
    #[must_use]
    pub const fn new(client: FmpClient, config: SourceConfig) -> Self {
        Self { client, config }
    }

    /// Create a source with a client read from `FMP_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    pub fn from_env(config: SourceConfig) -> crate::Result<Self> {
        Ok(Self::new(FmpClient::from_env()?, config))
    }

    /// Assumptions in use.
    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch the raw data behind a ticker's inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::DataFetch`] on transport or API failures.
    pub async fn fetch_data(&self, ticker: &str) -> Result<ValuationData> {
        let data = self
            .client
            .valuation_data(ticker, self.config.history_periods)
            .await?;
        debug!(
            ticker,
            income = data.income_statements.len(),
            balance = data.balance_sheets.len(),
            cash_flow = data.cash_flows.len(),
            "fetched statements"
        );
        Ok(data)
    }
}

impl InputSource for FmpInputSource {
    fn name(&self) -> &str {
        "fmp"
    }

    async fn fetch_inputs(&self, ticker: &str) -> Result<ValuationInputs> {
        let data = self.fetch_data(ticker).await?;
        let inputs = estimate_inputs(&data, &self.config)?;
        info!(
            ticker = %inputs.ticker,
            growth = inputs.revenue_growth.compound_rate(),
            terminal_growth = inputs.terminal_growth,
            "estimated inputs"
        );
        Ok(inputs)
    }
}

/// Estimate DCF inputs from fetched statements.
///
/// # Errors
///
/// Returns [`ValuationError::MissingInput`] when the quote has no usable
/// price or share count, or no statement reports positive revenue.
pub fn estimate_inputs(data: &ValuationData, config: &SourceConfig) -> Result<ValuationInputs> {
    let mut sorted = data.clone();
    sorted.sort_newest_first();
    let data = &sorted;

    let ticker = data.symbol.as_str();
    let periods = config.history_periods as usize;
    let take = |series: Vec<f64>| series.into_iter().take(periods).collect::<Vec<_>>();

    let revenues = take(data.revenues());
    let base_revenue = revenues
        .iter()
        .copied()
        .find(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| ValuationError::MissingInput(format!("no positive revenue for {ticker}")))?;

    let price = data.quote.price;
    if !price.is_finite() {
        return Err(ValuationError::MissingInput(format!("no price for {ticker}")));
    }
    let shares = data
        .quote
        .implied_shares()
        .or_else(|| {
            data.latest_income()
                .map(|s| s.weighted_average_shs_out_dil)
                .filter(|s| *s > 0.0)
        })
        .ok_or_else(|| ValuationError::MissingInput(format!("no share count for {ticker}")))?;

    let growth = clamp_growth(revenue_growth(&revenues));
    let capex_pct = capex_intensity(&take(data.capex()), &revenues).min(1.0);
    let ocf_pct = operating_cash_flow_margin(&take(data.operating_cash_flow()), &revenues);
    let ebitda = ebitda_margin(&take(data.ebitda()), &revenues).clamp(-1.0, 1.0);
    let ebit = ebit_margin(&take(data.operating_income()), &revenues).clamp(-1.0, 1.0);
    let depreciation_pct = average_ratio(&take(data.depreciation()), &revenues)
        .filter(|d| *d > 0.0)
        .map(|d| d.min(1.0));

    let (tax_rate, cost_of_debt) = data.latest_income().map_or(
        (effective_tax_rate(0.0, 0.0), implied_cost_of_debt(0.0, 0.0)),
        |s| {
            let total_debt = data.latest_balance().map_or(0.0, |b| b.total_debt);
            (
                effective_tax_rate(s.income_tax_expense, s.income_before_tax),
                implied_cost_of_debt(s.interest_expense, total_debt),
            )
        },
    );

    let country = data
        .profile
        .country()
        .unwrap_or(config.default_country.as_str())
        .to_string();
    let erp = equity_risk_premium(&country);
    let terminal_growth = config
        .terminal_growth
        .unwrap_or_else(|| long_term_growth(&country));

    let structure = data
        .ratios_ttm
        .as_ref()
        .and_then(|r| r.debt_to_capital_ratio)
        .filter(|d| d.is_finite())
        .map_or_else(
            || Ok(CapitalStructure::default()),
            |d| CapitalStructure::from_debt_ratio(d.clamp(0.0, 1.0)),
        )?;
    let beta = data.profile.beta_or_market();

    let costs = CapitalCosts {
        risk_free_rate: config.risk_free_rate,
        beta,
        equity_risk_premium: erp,
        cost_of_debt,
        debt_weight: structure.debt_weight,
        equity_weight: structure.equity_weight,
    };

    let net_debt = data.latest_balance().map_or(0.0, |b| b.net_debt());
    let company_name = data
        .profile
        .company_name
        .clone()
        .or_else(|| data.quote.name.clone());

    let pct = |x: f64| round_to(x * 100.0, 2);
    let mut inputs = ValuationInputs::new(ticker, price, shares, base_revenue)
        .with_growth(GrowthSchedule::Flat(growth))
        .with_horizon(config.horizon)
        .with_margins(ebitda, ebit)
        .with_tax_rate(tax_rate)
        .with_reinvestment(Reinvestment {
            depreciation_pct,
            capex_pct,
            working_capital_pct: config.working_capital_pct,
        })
        .with_discount(DiscountRate::Derived(costs))
        .with_terminal_growth(terminal_growth)
        .with_net_debt(net_debt)
        .with_parameter("revenue_growth_pct", pct(growth))
        .with_parameter("capital_expenditure_pct", pct(capex_pct))
        .with_parameter("operating_cash_flow_pct", pct(ocf_pct))
        .with_parameter("market_risk_premium", pct(erp))
        .with_parameter("long_term_growth_rate", pct(terminal_growth))
        .with_parameter("beta", round_to(beta, 4))
        .with_parameter("tax_rate", round_to(tax_rate, 4))
        .with_parameter("cost_of_debt", round_to(cost_of_debt, 4))
        .with_parameter("debt_ratio", round_to(structure.debt_weight, 4))
        .with_parameter("country", country);

    if let Some(name) = company_name {
        inputs = inputs.with_company_name(name);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement, Quote, RatiosTtm};
    use approx::assert_relative_eq;

    fn income(revenue: f64) -> IncomeStatement {
        IncomeStatement {
            date: "2024-12-31".into(),
            symbol: "ACME".into(),
            period: "FY".into(),
            revenue,
            operating_income: revenue * 0.20,
            ebitda: revenue * 0.30,
            depreciation_and_amortization: revenue * 0.04,
            interest_expense: 5.0,
            income_before_tax: 100.0,
            income_tax_expense: 21.0,
            net_income: 79.0,
            weighted_average_shs_out_dil: 900.0,
        }
    }

    fn cash_flow(revenue: f64) -> CashFlowStatement {
        CashFlowStatement {
            date: "2024-12-31".into(),
            symbol: "ACME".into(),
            period: "FY".into(),
            operating_cash_flow: revenue * 0.25,
            capital_expenditure: -revenue * 0.06,
            free_cash_flow: revenue * 0.19,
        }
    }

    fn data() -> ValuationData {
        let revenues = [121.0, 110.0, 100.0];
        ValuationData {
            symbol: "ACME".into(),
            profile: CompanyProfile {
                symbol: "ACME".into(),
                company_name: Some("Acme Corp".into()),
                beta: Some(1.2),
                country: Some("Taiwan".into()),
                market_cap: Some(5_000.0),
                price: Some(50.0),
                currency: Some("USD".into()),
            },
            quote: Quote {
                symbol: "ACME".into(),
                name: Some("Acme".into()),
                price: 50.0,
                market_cap: 5_000.0,
                shares_outstanding: None,
            },
            income_statements: revenues.iter().map(|r| income(*r)).collect(),
            balance_sheets: vec![BalanceSheet {
                date: "2024-12-31".into(),
                symbol: "ACME".into(),
                period: "FY".into(),
                cash_and_cash_equivalents: 20.0,
                total_debt: 100.0,
                total_stockholders_equity: 400.0,
            }],
            cash_flows: revenues.iter().map(|r| cash_flow(*r)).collect(),
            ratios_ttm: Some(RatiosTtm {
                symbol: "ACME".into(),
                debt_to_capital_ratio: Some(0.2),
            }),
        }
    }

    #[test]
    fn test_estimate_orders_statements_by_date() {
        let mut data = data();
        for (year, stmt) in (2022..=2024).rev().zip(&mut data.income_statements) {
            stmt.date = format!("{year}-12-31");
        }
        for (year, cf) in (2022..=2024).rev().zip(&mut data.cash_flows) {
            cf.date = format!("{year}-12-31");
        }
        data.income_statements.reverse();
        data.cash_flows.reverse();
        assert_relative_eq!(data.revenues()[0], 100.0);

        let inputs = estimate_inputs(&data, &SourceConfig::default()).unwrap();
        assert_relative_eq!(inputs.revenue, 121.0);
        assert_relative_eq!(inputs.revenue_growth.compound_rate(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_inputs() {
        let inputs = estimate_inputs(&data(), &SourceConfig::default()).unwrap();

        assert_eq!(inputs.ticker, "ACME");
        assert_eq!(inputs.company_name.as_deref(), Some("Acme Corp"));
        assert_relative_eq!(inputs.revenue, 121.0);
        assert_relative_eq!(inputs.shares_outstanding, 100.0);
        assert_relative_eq!(inputs.revenue_growth.compound_rate(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(inputs.ebitda_margin, 0.30, epsilon = 1e-12);
        assert_relative_eq!(inputs.ebit_margin, 0.20, epsilon = 1e-12);
        assert_relative_eq!(inputs.tax_rate, 0.21, epsilon = 1e-12);
        assert_relative_eq!(inputs.reinvestment.capex_pct, 0.06, epsilon = 1e-12);
        assert_relative_eq!(inputs.reinvestment.depreciation_pct.unwrap(), 0.04, epsilon = 1e-12);
        assert_relative_eq!(inputs.net_debt, 80.0);
        // Taiwan long-term growth
        assert_relative_eq!(inputs.terminal_growth, 0.025, epsilon = 1e-12);

        let DiscountRate::Derived(costs) = inputs.discount else {
            panic!("expected derived discount rate");
        };
        assert_relative_eq!(costs.beta, 1.2);
        assert_relative_eq!(costs.equity_risk_premium, 0.0501, epsilon = 1e-12);
        assert_relative_eq!(costs.cost_of_debt, 0.05, epsilon = 1e-12);
        assert_relative_eq!(costs.debt_weight, 0.2);
        assert_relative_eq!(costs.equity_weight, 0.8);
    }

    #[test]
    fn test_parameters_used() {
        let inputs = estimate_inputs(&data(), &SourceConfig::default()).unwrap();
        let params = &inputs.parameters_used;

        assert_eq!(params["country"], "Taiwan");
        assert_eq!(params["revenue_growth_pct"], 10.0);
        assert_eq!(params["capital_expenditure_pct"], 6.0);
        assert_eq!(params["operating_cash_flow_pct"], 25.0);
        assert_eq!(params["market_risk_premium"], 5.01);
        assert_eq!(params["long_term_growth_rate"], 2.5);
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let mut data = data();
        data.profile.country = None;
        data.ratios_ttm = None;
        let config = SourceConfig {
            terminal_growth: Some(0.02),
            ..SourceConfig::default()
        };
        let inputs = estimate_inputs(&data, &config).unwrap();

        assert_eq!(inputs.parameters_used["country"], "United States");
        assert_relative_eq!(inputs.terminal_growth, 0.02);
        let DiscountRate::Derived(costs) = inputs.discount else {
            panic!("expected derived discount rate");
        };
        assert_relative_eq!(costs.debt_weight, 0.3);
        assert_relative_eq!(costs.equity_risk_premium, 0.0446, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_revenue() {
        let mut data = data();
        for s in &mut data.income_statements {
            s.revenue = 0.0;
        }
        let err = estimate_inputs(&data, &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, ValuationError::MissingInput(_)));
    }

    #[test]
    fn test_share_count_falls_back_to_statements() {
        let mut data = data();
        data.quote.market_cap = 0.0;
        let inputs = estimate_inputs(&data, &SourceConfig::default()).unwrap();
        assert_relative_eq!(inputs.shares_outstanding, 900.0);
    }

    #[test]
    fn test_history_periods_limit() {
        let config = SourceConfig {
            history_periods: 2,
            ..SourceConfig::default()
        };
        let inputs = estimate_inputs(&data(), &config).unwrap();
        assert_relative_eq!(inputs.revenue_growth.compound_rate(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(inputs.parameters_used["revenue_growth_pct"].as_f64().unwrap(), 10.0);
    }
}
