//! Data types for FMP API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// Company profile from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Levered beta.
    #[serde(default)]
    pub beta: Option<f64>,
    /// Country of incorporation / listing.
    #[serde(default)]
    pub country: Option<String>,
    /// Market capitalization.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Last price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Reporting currency.
    #[serde(default)]
    pub currency: Option<String>,
}

impl CompanyProfile {
    /// Beta, or 1.0 when missing or not a usable number.
    #[must_use]
    pub fn beta_or_market(&self) -> f64 {
        self.beta.filter(|b| b.is_finite() && *b != 0.0).unwrap_or(1.0)
    }

    /// Country, if the profile carries a non-empty one.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Filing date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period (annual/quarterly).
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    #[serde(default)]
    pub revenue: f64,
    /// Operating income (EBIT).
    #[serde(default)]
    pub operating_income: f64,
    /// EBITDA.
    #[serde(default)]
    pub ebitda: f64,
    /// Depreciation and amortization.
    #[serde(default)]
    pub depreciation_and_amortization: f64,
    /// Interest expense.
    #[serde(default)]
    pub interest_expense: f64,
    /// Income before tax.
    #[serde(default)]
    pub income_before_tax: f64,
    /// Income tax expense.
    #[serde(default)]
    pub income_tax_expense: f64,
    /// Net income.
    #[serde(default)]
    pub net_income: f64,
    /// Weighted average shares outstanding (diluted).
    #[serde(default)]
    pub weighted_average_shs_out_dil: f64,
}

fn parse_statement_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Sort newest first; undated statements go last, in their original order.
fn sort_newest_first<T>(statements: &mut [T], date: impl Fn(&T) -> &str) {
    statements.sort_by_key(|s| std::cmp::Reverse(parse_statement_date(date(s))));
}

impl IncomeStatement {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_statement_date(&self.date)
    }
}

/// Balance sheet data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Filing date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period.
    #[serde(default)]
    pub period: String,
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash_and_cash_equivalents: f64,
    /// Total debt.
    #[serde(default)]
    pub total_debt: f64,
    /// Total stockholders' equity.
    #[serde(default)]
    pub total_stockholders_equity: f64,
}

impl BalanceSheet {
    /// Total debt less cash.
    #[must_use]
    pub fn net_debt(&self) -> f64 {
        self.total_debt - self.cash_and_cash_equivalents
    }
}

/// Cash flow statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Filing date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period.
    #[serde(default)]
    pub period: String,
    /// Operating cash flow.
    #[serde(default)]
    pub operating_cash_flow: f64,
    /// Capital expenditure (reported negative).
    #[serde(default)]
    pub capital_expenditure: f64,
    /// Free cash flow.
    #[serde(default)]
    pub free_cash_flow: f64,
}

/// Trailing-twelve-month ratios from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatiosTtm {
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Debt / (debt + equity).
    #[serde(rename = "debtToCapitalRatioTTM", default)]
    pub debt_to_capital_ratio: Option<f64>,
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current price.
    pub price: f64,
    /// Market cap.
    #[serde(default)]
    pub market_cap: f64,
    /// Shares outstanding, when the endpoint reports it.
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

impl Quote {
    /// Shares outstanding, falling back to market cap / price.
    #[must_use]
    pub fn implied_shares(&self) -> Option<f64> {
        self.shares_outstanding
            .filter(|s| s.is_finite() && *s > 0.0)
            .or_else(|| (self.price > 0.0 && self.market_cap > 0.0).then(|| self.market_cap / self.price))
    }
}

/// Everything needed to estimate DCF inputs for one symbol.
#[derive(Debug, Clone)]
pub struct ValuationData {
    /// Ticker symbol.
    pub symbol: String,
    /// Company profile.
    pub profile: CompanyProfile,
    /// Current quote.
    pub quote: Quote,
    /// Income statements (most recent first).
    pub income_statements: Vec<IncomeStatement>,
    /// Balance sheets (most recent first).
    pub balance_sheets: Vec<BalanceSheet>,
    /// Cash flow statements (most recent first).
    pub cash_flows: Vec<CashFlowStatement>,
    /// TTM ratios, if the endpoint answered.
    pub ratios_ttm: Option<RatiosTtm>,
}

impl ValuationData {
    /// Order every statement series by filing date, most recent first.
    ///
    /// The series helpers below rely on this order.
    pub fn sort_newest_first(&mut self) {
        sort_newest_first(&mut self.income_statements, |s| s.date.as_str());
        sort_newest_first(&mut self.balance_sheets, |s| s.date.as_str());
        sort_newest_first(&mut self.cash_flows, |s| s.date.as_str());
    }

    /// Get the most recent income statement.
    #[must_use]
    pub fn latest_income(&self) -> Option<&IncomeStatement> {
        self.income_statements.first()
    }

    /// Get the most recent balance sheet.
    #[must_use]
    pub fn latest_balance(&self) -> Option<&BalanceSheet> {
        self.balance_sheets.first()
    }

    /// Revenue per period, most recent first.
    #[must_use]
    pub fn revenues(&self) -> Vec<f64> {
        self.income_statements.iter().map(|s| s.revenue).collect()
    }

    /// EBITDA per period, most recent first.
    #[must_use]
    pub fn ebitda(&self) -> Vec<f64> {
        self.income_statements.iter().map(|s| s.ebitda).collect()
    }

    /// Operating income per period, most recent first.
    #[must_use]
    pub fn operating_income(&self) -> Vec<f64> {
        self.income_statements.iter().map(|s| s.operating_income).collect()
    }

    /// Depreciation and amortization per period, most recent first.
    #[must_use]
    pub fn depreciation(&self) -> Vec<f64> {
        self.income_statements
            .iter()
            .map(|s| s.depreciation_and_amortization)
            .collect()
    }

    /// Capital expenditure per period, most recent first.
    #[must_use]
    pub fn capex(&self) -> Vec<f64> {
        self.cash_flows.iter().map(|c| c.capital_expenditure).collect()
    }

    /// Operating cash flow per period, most recent first.
    #[must_use]
    pub fn operating_cash_flow(&self) -> Vec<f64> {
        self.cash_flows.iter().map(|c| c.operating_cash_flow).collect()
    }
}
