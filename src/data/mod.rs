//! Remote market data access
//!
//! This module contains the HTTP client for the financial data API, the
//! read-through fetch policy that puts the expiring cache in front of it, the
//! per-operation `StockApi`, and the watchlist store.

pub mod fetcher;
pub mod remote;
pub mod stock_api;
pub mod watchlist;

pub use fetcher::{OnFailure, ReadThroughFetcher};
pub use remote::{check_payload, AlphaVantageClient, Params, RemoteSource};
pub use stock_api::{IndicatorQuery, IntradayInterval, MacdQuery, NewsQuery, OutputSize, StockApi};
pub use watchlist::{WatchedStock, Watchlist, WatchlistStore, WATCHLISTS_KEY};
