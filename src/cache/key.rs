//! Structured cache keys
//!
//! A key is an operation prefix followed by its encoded parameters, e.g.
//! `companyOverview_ZZZZ` or `intraday_AAPL_5min_compact`. Parameters are
//! escaped so that `_` only ever appears as a separator, which keeps the
//! encoding injective and safe to use as a file name.

use std::fmt;

/// Remote operations the application can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    TopGainersLosers,
    GlobalQuote,
    Intraday,
    CompanyOverview,
    NewsSentiment,
    MarketStatus,
    Earnings,
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    Sma,
    Ema,
    Rsi,
    Macd,
    TimeSeriesDaily,
    SymbolSearch,
}

/// What a read-through fetch does when the remote call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller
    Propagate,
    /// Return a synthetic payload, never cached
    SubstituteFallback,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::TopGainersLosers,
        Operation::GlobalQuote,
        Operation::Intraday,
        Operation::CompanyOverview,
        Operation::NewsSentiment,
        Operation::MarketStatus,
        Operation::Earnings,
        Operation::IncomeStatement,
        Operation::BalanceSheet,
        Operation::CashFlow,
        Operation::Sma,
        Operation::Ema,
        Operation::Rsi,
        Operation::Macd,
        Operation::TimeSeriesDaily,
        Operation::SymbolSearch,
    ];

    /// Prefix of every cache key built for this operation
    pub fn key_prefix(self) -> &'static str {
        match self {
            Operation::TopGainersLosers => "topGainersLosers",
            Operation::GlobalQuote => "globalQuote",
            Operation::Intraday => "intraday",
            Operation::CompanyOverview => "companyOverview",
            Operation::NewsSentiment => "newsSentiment",
            Operation::MarketStatus => "marketStatus",
            Operation::Earnings => "earnings",
            Operation::IncomeStatement => "incomeStatement",
            Operation::BalanceSheet => "balanceSheet",
            Operation::CashFlow => "cashFlow",
            Operation::Sma => "sma",
            Operation::Ema => "ema",
            Operation::Rsi => "rsi",
            Operation::Macd => "macd",
            Operation::TimeSeriesDaily => "timeSeries",
            Operation::SymbolSearch => "search",
        }
    }

    /// Identifier the remote source expects in its `function` parameter
    pub fn function(self) -> &'static str {
        match self {
            Operation::TopGainersLosers => "TOP_GAINERS_LOSERS",
            Operation::GlobalQuote => "GLOBAL_QUOTE",
            Operation::Intraday => "TIME_SERIES_INTRADAY",
            Operation::CompanyOverview => "OVERVIEW",
            Operation::NewsSentiment => "NEWS_SENTIMENT",
            Operation::MarketStatus => "MARKET_STATUS",
            Operation::Earnings => "EARNINGS",
            Operation::IncomeStatement => "INCOME_STATEMENT",
            Operation::BalanceSheet => "BALANCE_SHEET",
            Operation::CashFlow => "CASH_FLOW",
            Operation::Sma => "SMA",
            Operation::Ema => "EMA",
            Operation::Rsi => "RSI",
            Operation::Macd => "MACD",
            Operation::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Operation::SymbolSearch => "SYMBOL_SEARCH",
        }
    }

    /// Failure handling for this operation
    ///
    /// Operations behind the main browsing screens degrade to synthetic data;
    /// the rest surface the error.
    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            Operation::TopGainersLosers
            | Operation::CompanyOverview
            | Operation::TimeSeriesDaily
            | Operation::NewsSentiment
            | Operation::SymbolSearch => FailurePolicy::SubstituteFallback,
            _ => FailurePolicy::Propagate,
        }
    }
}

/// Marker rendered for an absent optional parameter
const ABSENT_PARAM: &str = "~";

/// Cache key for one parameterized request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: Operation,
    rendered: String,
}

impl CacheKey {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            rendered: operation.key_prefix().to_string(),
        }
    }

    /// Appends a parameter value
    pub fn param(mut self, value: impl fmt::Display) -> Self {
        self.rendered.push('_');
        escape_into(&value.to_string(), &mut self.rendered);
        self
    }

    /// Appends an optional parameter; `None` renders differently from every value
    pub fn opt<T: fmt::Display>(mut self, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(value),
            None => {
                self.rendered.push('_');
                self.rendered.push_str(ABSENT_PARAM);
                self
            }
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.rendered
    }
}

/// Percent-escapes everything except ASCII alphanumerics and `.`
fn escape_into(value: &str, out: &mut String) {
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'.' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
}
