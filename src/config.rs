//! Configuration Module
//!
//! Handles loading client configuration from environment variables. The
//! resulting `Config` is immutable and passed explicitly to the client.

use chrono::Duration;
use std::env;
use std::path::PathBuf;

/// Base endpoint of the financial data API
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Credential used when none is configured
pub const DEFAULT_API_KEY: &str = "demo";

/// Default cache TTL in seconds (one hour)
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Key prefixes removed by a bulk cache clear
pub const INVALIDATION_PREFIXES: &[&str] = &[
    "topGainersLosers",
    "companyOverview_",
    "timeSeries_",
    "search_",
];

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Remote API endpoint
    pub base_url: String,
    /// Remote API credential
    pub api_key: String,
    /// How long cached responses stay fresh
    pub ttl: Duration,
    /// Cache directory; `None` means the XDG default
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MARKETVIEW_BASE_URL` - API endpoint (default: Alpha Vantage query URL)
    /// - `MARKETVIEW_API_KEY` - API key (default: "demo")
    /// - `MARKETVIEW_CACHE_TTL_SECS` - Cache TTL in seconds (default: 3600)
    /// - `MARKETVIEW_CACHE_DIR` - Cache directory (default: XDG cache dir)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("MARKETVIEW_BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            api_key: lookup("MARKETVIEW_API_KEY")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_key),
            ttl: lookup("MARKETVIEW_CACHE_TTL_SECS")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|secs| *secs >= 0)
                .and_then(Duration::try_seconds)
                .unwrap_or(defaults.ttl),
            cache_dir: lookup("MARKETVIEW_CACHE_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            cache_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, "demo");
        assert_eq!(config.ttl.num_milliseconds(), 3_600_000);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MARKETVIEW_BASE_URL", "http://localhost:9999/query"),
            ("MARKETVIEW_API_KEY", "secret"),
            ("MARKETVIEW_CACHE_TTL_SECS", "60"),
            ("MARKETVIEW_CACHE_DIR", "/tmp/mv"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://localhost:9999/query");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.ttl, Duration::seconds(60));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/mv")));
    }

    #[test]
    fn test_config_ignores_invalid_ttl() {
        let config = Config::from_lookup(|name| match name {
            "MARKETVIEW_CACHE_TTL_SECS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.ttl, Duration::seconds(DEFAULT_TTL_SECS));

        let negative = Config::from_lookup(|name| match name {
            "MARKETVIEW_CACHE_TTL_SECS" => Some("-5".to_string()),
            _ => None,
        });
        assert_eq!(negative.ttl, Duration::seconds(DEFAULT_TTL_SECS));

        let huge = Config::from_lookup(|name| match name {
            "MARKETVIEW_CACHE_TTL_SECS" => Some(i64::MAX.to_string()),
            _ => None,
        });
        assert_eq!(huge.ttl, Duration::seconds(DEFAULT_TTL_SECS));
    }
}
