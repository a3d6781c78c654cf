//! Market data module
//!
//! Perpetual asset snapshots and hourly candles from the Hyperliquid info API

mod hyperliquid;

pub use hyperliquid::{HyperliquidClient, HyperliquidConfig, HYPERLIQUID_API_URL};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current state of one perpetual market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Coin name (e.g., "SOL")
    pub name: String,
    /// 24h notional volume in USD
    pub volume_24h: Decimal,
    /// Mark price
    pub price: Decimal,
}

/// Hourly OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Flat candle at a single price
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Universe entry with the listing attributes used for strict list selection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseAsset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_delisted: bool,
    #[serde(default)]
    pub only_isolated: bool,
    #[serde(default)]
    pub max_leverage: u32,
    #[serde(default)]
    pub margin_table_id: u32,
}

/// Market data client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status code
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },
    /// Body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Body decoded but had an unexpected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Source of asset snapshots and candles
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch every listed perpetual with its 24h volume and mark price
    async fn fetch_assets(&self) -> Result<Vec<AssetSnapshot>, ClientError>;

    /// Fetch the most recent `count` hourly candles for `coin`
    async fn fetch_candles(&self, coin: &str, count: usize) -> Result<Vec<Candle>, ClientError>;
}
