//! Command-line interface parsing for marketview
//!
//! This module handles parsing of CLI arguments using clap: global options
//! that override the environment configuration, and one subcommand per
//! market data operation.

use chrono::Duration;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;
use crate::data::{IntradayInterval, OutputSize};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified intraday interval is not recognized
    #[error("Invalid interval: '{0}'. Valid intervals: 1min, 5min, 15min, 30min, 60min")]
    InvalidInterval(String),

    /// The specified output size is not recognized
    #[error("Invalid output size: '{0}'. Valid sizes: compact, full")]
    InvalidOutputSize(String),
}

/// marketview - Browse stock market data from the terminal
#[derive(Parser, Debug)]
#[command(name = "marketview")]
#[command(about = "Stock quotes, movers, charts data and news with a local response cache")]
#[command(version)]
pub struct Cli {
    /// API key (overrides MARKETVIEW_API_KEY)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Cache time-to-live in seconds (overrides MARKETVIEW_CACHE_TTL_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    pub ttl: Option<u32>,

    /// Cache directory (overrides MARKETVIEW_CACHE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log cache and request activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Top gainers and losers
    Movers,
    /// Latest quote for a symbol
    Quote { symbol: String },
    /// Intraday price series
    Intraday {
        symbol: String,
        #[arg(long, default_value = "5min")]
        interval: String,
        #[arg(long, default_value = "compact")]
        output_size: String,
    },
    /// Company profile
    Overview { symbol: String },
    /// Daily price series
    Daily {
        symbol: String,
        #[arg(long, default_value = "compact")]
        output_size: String,
    },
    /// News with sentiment scores
    News {
        /// Comma separated tickers
        #[arg(long)]
        tickers: Option<String>,
        #[arg(long)]
        topics: Option<String>,
        #[arg(long, value_name = "YYYYMMDDTHHMM")]
        time_from: Option<String>,
        #[arg(long, value_name = "YYYYMMDDTHHMM")]
        time_to: Option<String>,
        #[arg(long, default_value = "LATEST")]
        sort: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Look up symbols by keyword
    Search { keywords: String },
    /// Open/closed status of global markets
    MarketStatus,
    /// Quarterly and annual earnings
    Earnings { symbol: String },
    /// Income statements
    Income { symbol: String },
    /// Balance sheets
    BalanceSheet { symbol: String },
    /// Cash flow statements
    CashFlow { symbol: String },
    /// Simple moving average
    Sma(IndicatorArgs),
    /// Exponential moving average
    Ema(IndicatorArgs),
    /// Relative strength index
    Rsi(IndicatorArgs),
    /// Moving average convergence/divergence
    Macd {
        symbol: String,
        #[arg(long, default_value = "daily")]
        interval: String,
        #[arg(long, default_value = "close")]
        series_type: String,
    },
    /// Remove cached movers, overviews, daily series and searches
    ClearCache,
    /// Manage watchlists
    #[command(subcommand)]
    Watchlist(WatchlistCommand),
}

/// Arguments shared by the indicator commands
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct IndicatorArgs {
    pub symbol: String,
    #[arg(long, default_value = "daily")]
    pub interval: String,
    /// Number of periods (defaults to 20, or 14 for RSI)
    #[arg(long)]
    pub time_period: Option<u32>,
    #[arg(long, default_value = "close")]
    pub series_type: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WatchlistCommand {
    /// Show all watchlists
    List,
    /// Create an empty watchlist
    Create { name: String },
    /// Delete a watchlist
    Delete { id: String },
    /// Add a ticker to a watchlist
    Add { id: String, ticker: String },
    /// Remove a ticker from a watchlist
    Remove { id: String, ticker: String },
    /// Fetch quotes for every ticker on a watchlist
    Quotes { id: String },
}

/// Parses an intraday interval argument.
///
/// # Returns
/// * `Ok(IntradayInterval)` if the string matches a valid interval
/// * `Err(CliError::InvalidInterval)` if the string doesn't match
pub fn parse_interval_arg(s: &str) -> Result<IntradayInterval, CliError> {
    IntradayInterval::from_str(s).ok_or_else(|| CliError::InvalidInterval(s.to_string()))
}

/// Parses an output size argument.
pub fn parse_output_size_arg(s: &str) -> Result<OutputSize, CliError> {
    OutputSize::from_str(s).ok_or_else(|| CliError::InvalidOutputSize(s.to_string()))
}

impl Cli {
    /// Applies the global options on top of a base configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(ttl) = self.ttl {
            config.ttl = Duration::seconds(i64::from(ttl));
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_arg() {
        assert_eq!(parse_interval_arg("15min").unwrap(), IntradayInterval::FifteenMin);
        let err = parse_interval_arg("2min").unwrap_err();
        assert!(err.to_string().contains("Invalid interval"));
        assert!(err.to_string().contains("2min"));
    }

    #[test]
    fn test_parse_output_size_arg() {
        assert_eq!(parse_output_size_arg("full").unwrap(), OutputSize::Full);
        assert!(parse_output_size_arg("huge").is_err());
    }

    #[test]
    fn test_cli_parse_quote() {
        let cli = Cli::parse_from(["marketview", "quote", "AAPL"]);
        assert_eq!(
            cli.command,
            Command::Quote {
                symbol: "AAPL".to_string()
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_intraday_defaults() {
        let cli = Cli::parse_from(["marketview", "intraday", "AAPL"]);
        match cli.command {
            Command::Intraday {
                interval,
                output_size,
                ..
            } => {
                assert_eq!(interval, "5min");
                assert_eq!(output_size, "compact");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_news_filters() {
        let cli = Cli::parse_from(["marketview", "news", "--tickers", "AAPL,MSFT", "--limit", "10"]);
        match cli.command {
            Command::News { tickers, limit, sort, .. } => {
                assert_eq!(tickers.as_deref(), Some("AAPL,MSFT"));
                assert_eq!(limit, 10);
                assert_eq!(sort, "LATEST");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_watchlist_add() {
        let cli = Cli::parse_from(["marketview", "watchlist", "add", "123", "TSLA"]);
        assert_eq!(
            cli.command,
            Command::Watchlist(WatchlistCommand::Add {
                id: "123".to_string(),
                ticker: "TSLA".to_string()
            })
        );
    }

    #[test]
    fn test_global_options_override_config() {
        let cli = Cli::parse_from([
            "marketview",
            "movers",
            "--api-key",
            "abc",
            "--ttl",
            "60",
            "--cache-dir",
            "/tmp/mv",
        ]);

        let config = cli.apply_to(Config::default());

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.ttl, Duration::seconds(60));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/mv")));
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let cli = Cli::parse_from(["marketview", "market-status"]);
        assert_eq!(cli.apply_to(Config::default()), Config::default());
    }
}
