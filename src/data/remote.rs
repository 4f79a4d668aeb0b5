//! Alpha Vantage API client
//!
//! This module sends query requests to the financial data API and classifies
//! the response. The API reports some failures inside HTTP 200 bodies; those
//! are turned into `RemoteError`s rather than returned as data.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::cache::Operation;
use crate::config::Config;
use crate::error::{ApiError, RemoteError};

/// Named request parameters, excluding the operation identifier and credential
pub type Params = Vec<(&'static str, String)>;

/// A source of remote market data
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Performs `operation` with the given parameters and returns the raw payload
    async fn request(&self, operation: Operation, params: &Params) -> Result<Value, ApiError>;
}

/// Client for the Alpha Vantage query endpoint
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    /// Creates a new client from configuration
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a new client with a custom HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl RemoteSource for AlphaVantageClient {
    async fn request(&self, operation: Operation, params: &Params) -> Result<Value, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        query.push(("function", operation.function()));
        query.extend(params.iter().map(|(name, value)| (*name, value.as_str())));

        debug!(function = operation.function(), ?params, "Making API request");
        query.push(("apikey", self.api_key.as_str()));

        let response = self.client.get(&self.base_url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;

        check_payload(payload).map_err(ApiError::from)
    }
}

/// Rejects payloads that carry one of the API's in-band error fields
pub fn check_payload(payload: Value) -> Result<Value, RemoteError> {
    if let Some(message) = payload.get("Error Message") {
        return Err(RemoteError::ErrorMessage(field_text(message)));
    }
    if let Some(note) = payload.get("Note") {
        return Err(RemoteError::RateLimited(field_text(note)));
    }
    if let Some(info) = payload.get("Information") {
        return Err(RemoteError::Information(field_text(info)));
    }
    Ok(payload)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
