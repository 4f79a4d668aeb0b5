//! Watchlist persistence
//!
//! Watchlists live under a single storage key with no expiration. Every
//! mutation reads the current lists, applies the change and writes them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::{Clock, Storage, SystemClock};
use crate::error::StorageError;

/// Storage key holding every watchlist
pub const WATCHLISTS_KEY: &str = "watchlists";

/// A stock saved to a watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedStock {
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WatchedStock {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
        }
    }
}

/// A named list of stocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: String,
    pub name: String,
    pub stocks: Vec<WatchedStock>,
    pub created_at: DateTime<Utc>,
}

impl Watchlist {
    pub fn contains(&self, ticker: &str) -> bool {
        self.stocks.iter().any(|s| s.ticker == ticker)
    }
}

/// CRUD access to watchlists
#[derive(Clone)]
pub struct WatchlistStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl WatchlistStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// All watchlists in creation order
    pub async fn list(&self) -> Result<Vec<Watchlist>, StorageError> {
        match self.storage.get(WATCHLISTS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Watchlist>, StorageError> {
        Ok(self.list().await?.into_iter().find(|w| w.id == id))
    }

    /// Creates an empty watchlist; ids are creation timestamps in milliseconds
    pub async fn create(&self, name: &str) -> Result<Watchlist, StorageError> {
        let mut lists = self.list().await?;
        let now = self.clock.now();

        let mut id_millis = now.timestamp_millis();
        while lists.iter().any(|w| w.id == id_millis.to_string()) {
            id_millis += 1;
        }

        let watchlist = Watchlist {
            id: id_millis.to_string(),
            name: name.to_string(),
            stocks: Vec::new(),
            created_at: now,
        };
        lists.push(watchlist.clone());
        self.save(&lists).await?;
        Ok(watchlist)
    }

    /// Deletes a watchlist; returns whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut lists = self.list().await?;
        let before = lists.len();
        lists.retain(|w| w.id != id);
        if lists.len() == before {
            return Ok(false);
        }
        self.save(&lists).await?;
        Ok(true)
    }

    /// Adds a stock unless the ticker is already on the list; returns whether it was added
    pub async fn add_stock(&self, id: &str, stock: WatchedStock) -> Result<bool, StorageError> {
        let mut lists = self.list().await?;
        let Some(watchlist) = lists.iter_mut().find(|w| w.id == id) else {
            return Ok(false);
        };
        if watchlist.contains(&stock.ticker) {
            return Ok(false);
        }
        watchlist.stocks.push(stock);
        self.save(&lists).await?;
        Ok(true)
    }

    /// Removes a ticker from a watchlist; returns whether it was present
    pub async fn remove_stock(&self, id: &str, ticker: &str) -> Result<bool, StorageError> {
        let mut lists = self.list().await?;
        let Some(watchlist) = lists.iter_mut().find(|w| w.id == id) else {
            return Ok(false);
        };
        let before = watchlist.stocks.len();
        watchlist.stocks.retain(|s| s.ticker != ticker);
        if watchlist.stocks.len() == before {
            return Ok(false);
        }
        self.save(&lists).await?;
        Ok(true)
    }

    /// Whether any watchlist holds `ticker`
    pub async fn contains(&self, ticker: &str) -> Result<bool, StorageError> {
        Ok(self.list().await?.iter().any(|w| w.contains(ticker)))
    }

    /// Watchlists holding `ticker`
    pub async fn lists_for(&self, ticker: &str) -> Result<Vec<Watchlist>, StorageError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|w| w.contains(ticker))
            .collect())
    }

    async fn save(&self, lists: &[Watchlist]) -> Result<(), StorageError> {
        let json = serde_json::to_string(lists)?;
        self.storage.set(WATCHLISTS_KEY, &json).await
    }
}
