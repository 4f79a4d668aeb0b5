//! Stock data API with read-through caching
//!
//! `StockApi` exposes one method per remote operation. Every call goes through
//! the expiring cache; on a miss the remote source is queried. Operations
//! behind the browsing screens (movers, overview, daily series, news, search)
//! fall back to synthetic data when the remote call fails. The others return
//! the error.

use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;

use super::fetcher::{OnFailure, ReadThroughFetcher};
use super::remote::{AlphaVantageClient, Params, RemoteSource};
use crate::cache::{CacheKey, CacheManager, Clock, Operation, Storage, SystemClock};
use crate::config::Config;
use crate::error::ApiError;
use crate::fallback;

/// Amount of history requested for series endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSize {
    /// Latest 100 data points
    #[default]
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compact" => Some(OutputSize::Compact),
            "full" => Some(OutputSize::Full),
            _ => None,
        }
    }
}

/// Bar width for intraday series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntradayInterval {
    OneMin,
    #[default]
    FiveMin,
    FifteenMin,
    ThirtyMin,
    SixtyMin,
}

impl IntradayInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            IntradayInterval::OneMin => "1min",
            IntradayInterval::FiveMin => "5min",
            IntradayInterval::FifteenMin => "15min",
            IntradayInterval::ThirtyMin => "30min",
            IntradayInterval::SixtyMin => "60min",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1min" | "1" => Some(IntradayInterval::OneMin),
            "5min" | "5" => Some(IntradayInterval::FiveMin),
            "15min" | "15" => Some(IntradayInterval::FifteenMin),
            "30min" | "30" => Some(IntradayInterval::ThirtyMin),
            "60min" | "60" => Some(IntradayInterval::SixtyMin),
            _ => None,
        }
    }
}

/// Parameters of a news sentiment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Comma separated tickers
    pub tickers: Option<String>,
    pub topics: Option<String>,
    /// Lower bound in `YYYYMMDDTHHMM` format
    pub time_from: Option<String>,
    /// Upper bound in `YYYYMMDDTHHMM` format
    pub time_to: Option<String>,
    /// `LATEST`, `EARLIEST` or `RELEVANCE`
    pub sort: String,
    pub limit: u32,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            tickers: None,
            topics: None,
            time_from: None,
            time_to: None,
            sort: "LATEST".to_string(),
            limit: 50,
        }
    }
}

/// Parameters shared by the moving average and RSI indicators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorQuery {
    pub symbol: String,
    /// `1min`..`60min`, `daily`, `weekly` or `monthly`
    pub interval: String,
    pub time_period: u32,
    /// `close`, `open`, `high` or `low`
    pub series_type: String,
}

impl IndicatorQuery {
    /// Daily closes over 20 periods, the moving average defaults
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: "daily".to_string(),
            time_period: 20,
            series_type: "close".to_string(),
        }
    }

    /// Daily closes over 14 periods, the RSI defaults
    pub fn rsi(symbol: impl Into<String>) -> Self {
        Self {
            time_period: 14,
            ..Self::new(symbol)
        }
    }
}

/// Parameters of a MACD request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacdQuery {
    pub symbol: String,
    pub interval: String,
    pub series_type: String,
    pub fast_period: u32,
    pub slow_period: u32,
    pub signal_period: u32,
}

impl MacdQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: "daily".to_string(),
            series_type: "close".to_string(),
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Client for all market data operations
///
/// Construct once and share by reference; it holds no ambient state.
#[derive(Clone)]
pub struct StockApi {
    remote: Arc<dyn RemoteSource>,
    fetcher: ReadThroughFetcher,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for StockApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockApi").field("fetcher", &self.fetcher).finish()
    }
}

impl StockApi {
    /// Creates an API backed by Alpha Vantage and the system clock
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self::with_parts(
            Arc::new(AlphaVantageClient::new(config)),
            storage,
            Arc::new(SystemClock),
            config.ttl,
        )
    }

    /// Creates an API from explicit collaborators
    pub fn with_parts(
        remote: Arc<dyn RemoteSource>,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        let cache = CacheManager::with_clock(storage, clock.clone(), ttl);
        Self {
            remote,
            fetcher: ReadThroughFetcher::new(cache),
            clock,
        }
    }

    pub fn cache(&self) -> &CacheManager {
        self.fetcher.cache()
    }

    /// Top gainers, losers and most active tickers
    pub async fn top_gainers_losers(&self) -> Result<Value, ApiError> {
        let now = self.clock.now();
        self.call(
            CacheKey::new(Operation::TopGainersLosers),
            Vec::new(),
            OnFailure::substitute(move || fallback::top_gainers_losers(now)),
        )
        .await
    }

    /// Latest price and volume for `symbol`
    pub async fn global_quote(&self, symbol: &str) -> Result<Value, ApiError> {
        self.symbol_call(Operation::GlobalQuote, symbol).await
    }

    pub async fn intraday(
        &self,
        symbol: &str,
        interval: IntradayInterval,
        output_size: OutputSize,
    ) -> Result<Value, ApiError> {
        let key = CacheKey::new(Operation::Intraday)
            .param(symbol)
            .param(interval.as_str())
            .param(output_size.as_str());
        let params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.as_str().to_string()),
            ("outputsize", output_size.as_str().to_string()),
        ];
        self.call(key, params, OnFailure::Propagate).await
    }

    /// Company profile and fundamentals
    pub async fn company_overview(&self, symbol: &str) -> Result<Value, ApiError> {
        let owned = symbol.to_string();
        self.call(
            CacheKey::new(Operation::CompanyOverview).param(symbol),
            vec![("symbol", symbol.to_string())],
            OnFailure::substitute(move || fallback::company_overview(&owned)),
        )
        .await
    }

    /// News articles with sentiment scores
    pub async fn news_sentiment(&self, query: &NewsQuery) -> Result<Value, ApiError> {
        let key = CacheKey::new(Operation::NewsSentiment)
            .opt(query.tickers.as_deref())
            .opt(query.topics.as_deref())
            .opt(query.time_from.as_deref())
            .opt(query.time_to.as_deref())
            .param(&query.sort)
            .param(query.limit);

        let mut params: Params = vec![
            ("sort", query.sort.clone()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(tickers) = &query.tickers {
            params.push(("tickers", tickers.clone()));
        }
        if let Some(topics) = &query.topics {
            params.push(("topics", topics.clone()));
        }
        if let Some(time_from) = &query.time_from {
            params.push(("time_from", time_from.clone()));
        }
        if let Some(time_to) = &query.time_to {
            params.push(("time_to", time_to.clone()));
        }

        let now = self.clock.now();
        let tickers = query.tickers.clone();
        let topics = query.topics.clone();
        self.call(
            key,
            params,
            OnFailure::substitute(move || {
                fallback::news_sentiment(tickers.as_deref(), topics.as_deref(), now)
            }),
        )
        .await
    }

    /// Open/closed status of the major trading venues
    pub async fn market_status(&self) -> Result<Value, ApiError> {
        self.call(CacheKey::new(Operation::MarketStatus), Vec::new(), OnFailure::Propagate)
            .await
    }

    pub async fn earnings(&self, symbol: &str) -> Result<Value, ApiError> {
        self.symbol_call(Operation::Earnings, symbol).await
    }

    pub async fn income_statement(&self, symbol: &str) -> Result<Value, ApiError> {
        self.symbol_call(Operation::IncomeStatement, symbol).await
    }

    pub async fn balance_sheet(&self, symbol: &str) -> Result<Value, ApiError> {
        self.symbol_call(Operation::BalanceSheet, symbol).await
    }

    pub async fn cash_flow(&self, symbol: &str) -> Result<Value, ApiError> {
        self.symbol_call(Operation::CashFlow, symbol).await
    }

    /// Simple moving average
    pub async fn sma(&self, query: &IndicatorQuery) -> Result<Value, ApiError> {
        self.indicator(Operation::Sma, query).await
    }

    /// Exponential moving average
    pub async fn ema(&self, query: &IndicatorQuery) -> Result<Value, ApiError> {
        self.indicator(Operation::Ema, query).await
    }

    /// Relative strength index
    pub async fn rsi(&self, query: &IndicatorQuery) -> Result<Value, ApiError> {
        self.indicator(Operation::Rsi, query).await
    }

    pub async fn macd(&self, query: &MacdQuery) -> Result<Value, ApiError> {
        let key = CacheKey::new(Operation::Macd)
            .param(&query.symbol)
            .param(&query.interval)
            .param(&query.series_type)
            .param(query.fast_period)
            .param(query.slow_period)
            .param(query.signal_period);
        let params = vec![
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.clone()),
            ("series_type", query.series_type.clone()),
            ("fastperiod", query.fast_period.to_string()),
            ("slowperiod", query.slow_period.to_string()),
            ("signalperiod", query.signal_period.to_string()),
        ];
        self.call(key, params, OnFailure::Propagate).await
    }

    /// Daily OHLCV series
    pub async fn time_series_daily(
        &self,
        symbol: &str,
        output_size: OutputSize,
    ) -> Result<Value, ApiError> {
        let key = CacheKey::new(Operation::TimeSeriesDaily)
            .param(symbol)
            .param(output_size.as_str());
        let params = vec![
            ("symbol", symbol.to_string()),
            ("outputsize", output_size.as_str().to_string()),
        ];
        let owned = symbol.to_string();
        let today = self.clock.now().date_naive();
        self.call(
            key,
            params,
            OnFailure::substitute(move || fallback::daily_series(&owned, today)),
        )
        .await
    }

    /// Ticker lookup by keywords
    pub async fn search_symbol(&self, keywords: &str) -> Result<Value, ApiError> {
        let owned = keywords.to_string();
        self.call(
            CacheKey::new(Operation::SymbolSearch).param(keywords),
            vec![("keywords", keywords.to_string())],
            OnFailure::substitute(move || fallback::symbol_search(&owned)),
        )
        .await
    }

    /// Removes the cached entries of the standard invalidation groups
    pub async fn clear_cache(&self) -> Result<usize, ApiError> {
        Ok(self.cache().clear_groups().await?)
    }

    async fn symbol_call(&self, operation: Operation, symbol: &str) -> Result<Value, ApiError> {
        self.call(
            CacheKey::new(operation).param(symbol),
            vec![("symbol", symbol.to_string())],
            OnFailure::Propagate,
        )
        .await
    }

    async fn indicator(&self, operation: Operation, query: &IndicatorQuery) -> Result<Value, ApiError> {
        let key = CacheKey::new(operation)
            .param(&query.symbol)
            .param(&query.interval)
            .param(query.time_period)
            .param(&query.series_type);
        let params = vec![
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.clone()),
            ("time_period", query.time_period.to_string()),
            ("series_type", query.series_type.clone()),
        ];
        self.call(key, params, OnFailure::Propagate).await
    }

    async fn call(
        &self,
        key: CacheKey,
        params: Params,
        on_failure: OnFailure<Value>,
    ) -> Result<Value, ApiError> {
        debug_assert_eq!(key.operation().failure_policy(), on_failure.policy());

        let operation = key.operation();
        let remote = self.remote.clone();
        self.fetcher
            .fetch(
                key.as_str(),
                move || async move { remote.request(operation, &params).await },
                on_failure,
            )
            .await
    }
}
