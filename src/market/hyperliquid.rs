//! Hyperliquid info API client
//!
//! All market data comes from `POST /info` with a `type` discriminator:
//! `metaAndAssetCtxs` for volumes and mark prices, `candleSnapshot` for
//! hourly candles and `meta` for listing attributes.

use super::{AssetSnapshot, Candle, ClientError, MarketData, UniverseAsset};
use crate::config::ClientConfig;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Hyperliquid API base URL
pub const HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";

/// Configuration for the Hyperliquid client
#[derive(Debug, Clone)]
pub struct HyperliquidConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Minimum spacing between requests (1200 requests/minute limit)
    pub min_request_interval: Duration,
    /// Additional attempts after a failed request
    pub retries: u32,
    /// Pause before each retry
    pub retry_delay: Duration,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            base_url: HYPERLIQUID_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            min_request_interval: Duration::from_millis(50),
            retries: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&ClientConfig> for HyperliquidConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            min_request_interval: Duration::from_millis(config.min_request_interval_ms),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Client for the Hyperliquid info endpoint
pub struct HyperliquidClient {
    config: HyperliquidConfig,
    client: Client,
    last_request: Mutex<Option<Instant>>,
}

impl HyperliquidClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(HyperliquidConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HyperliquidConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            client,
            last_request: Mutex::new(None),
        })
    }

    fn info_url(&self) -> String {
        format!("{}/info", self.config.base_url.trim_end_matches('/'))
    }

    /// Wait until `min_request_interval` has passed since the previous request
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.min_request_interval {
                tokio::time::sleep(self.config.min_request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// POST a request body, retrying up to `retries` times
    async fn post<T: DeserializeOwned>(&self, body: &Value) -> Result<T, ClientError> {
        self.rate_limit().await;

        let mut attempt = 0;
        loop {
            match self.send(body).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    tracing::debug!(error = %e, attempt, "Info request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempts = attempt + 1,
                        "Info request failed"
                    );
                    metrics::counter!("volspike_client_errors_total").increment(1);
                    return Err(e);
                }
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, body: &Value) -> Result<T, ClientError> {
        let response = self.client.post(self.info_url()).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch listing attributes for every perpetual
    pub async fn fetch_universe(&self) -> Result<Vec<UniverseAsset>, ClientError> {
        let meta: UniverseMeta = self.post(&json!({ "type": "meta" })).await?;
        Ok(meta.universe)
    }
}

#[async_trait]
impl MarketData for HyperliquidClient {
    async fn fetch_assets(&self) -> Result<Vec<AssetSnapshot>, ClientError> {
        tracing::debug!("Fetching universe and asset contexts");

        let response: Value = self.post(&json!({ "type": "metaAndAssetCtxs" })).await?;
        let (meta, contexts) = parse_meta_and_contexts(response)?;
        let assets = pair_assets(meta.universe, contexts);

        tracing::debug!(asset_count = assets.len(), "Fetched asset snapshots");
        Ok(assets)
    }

    async fn fetch_candles(&self, coin: &str, count: usize) -> Result<Vec<Candle>, ClientError> {
        let end = Utc::now();
        let start = end - ChronoDuration::hours(count as i64);

        let body = json!({
            "type": "candleSnapshot",
            "req": {
                "coin": coin,
                "interval": "1h",
                "startTime": start.timestamp_millis(),
                "endTime": end.timestamp_millis(),
            }
        });

        let raw: Vec<Value> = self.post(&body).await?;
        let candles = parse_candles(raw);

        tracing::debug!(coin, count = candles.len(), "Fetched hourly candles");
        Ok(candles)
    }
}

/// `meta` response and first element of `metaAndAssetCtxs`
#[derive(Debug, Deserialize)]
struct UniverseMeta {
    #[serde(default)]
    universe: Vec<UniverseAsset>,
}

/// Per-asset context, index aligned with the universe
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetContext {
    #[serde(default)]
    day_ntl_vlm: Option<String>,
    #[serde(default)]
    mark_px: Option<String>,
}

/// Raw candle; numeric fields arrive as strings
#[derive(Debug, Deserialize)]
struct RawCandle {
    t: i64,
    o: String,
    h: String,
    l: String,
    c: String,
    v: String,
}

/// Split a `metaAndAssetCtxs` response into its two halves
fn parse_meta_and_contexts(
    response: Value,
) -> Result<(UniverseMeta, Vec<AssetContext>), ClientError> {
    let Value::Array(mut parts) = response else {
        return Err(ClientError::UnexpectedResponse(
            "metaAndAssetCtxs is not an array".to_string(),
        ));
    };
    if parts.len() != 2 {
        return Err(ClientError::UnexpectedResponse(format!(
            "metaAndAssetCtxs has {} elements, expected 2",
            parts.len()
        )));
    }

    let contexts: Vec<AssetContext> = serde_json::from_value(parts.pop().unwrap_or_default())?;
    let meta: UniverseMeta = serde_json::from_value(parts.pop().unwrap_or_default())?;
    Ok((meta, contexts))
}

/// Join universe entries with their contexts by index
///
/// Entries without a name or without a matching context are dropped.
fn pair_assets(universe: Vec<UniverseAsset>, contexts: Vec<AssetContext>) -> Vec<AssetSnapshot> {
    universe
        .into_iter()
        .zip(contexts)
        .filter_map(|(asset, ctx)| {
            let name = asset.name.filter(|n| !n.is_empty())?;
            Some(AssetSnapshot {
                name,
                volume_24h: parse_decimal(ctx.day_ntl_vlm.as_deref()),
                price: parse_decimal(ctx.mark_px.as_deref()),
            })
        })
        .collect()
}

fn parse_decimal(value: Option<&str>) -> Decimal {
    value
        .and_then(|v| Decimal::from_str(v).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Decode candles, skipping any with missing or unparsable fields
fn parse_candles(raw: Vec<Value>) -> Vec<Candle> {
    raw.into_iter()
        .filter_map(|value| {
            let candle: RawCandle = serde_json::from_value(value).ok()?;
            Some(Candle {
                timestamp: Utc.timestamp_millis_opt(candle.t).single()?,
                open: candle.o.parse().ok()?,
                high: candle.h.parse().ok()?,
                low: candle.l.parse().ok()?,
                close: candle.c.parse().ok()?,
                volume: candle.v.parse().ok()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_client_creation() {
        let client = HyperliquidClient::new().unwrap();
        assert_eq!(client.config.base_url, HYPERLIQUID_API_URL);
        assert_eq!(client.info_url(), "https://api.hyperliquid.xyz/info");
    }

    #[test]
    fn test_config_default() {
        let config = HyperliquidConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.min_request_interval, Duration::from_millis(50));
        assert_eq!(config.retries, 1);
    }

    #[test]
    fn test_info_url_trailing_slash() {
        let client = HyperliquidClient::with_config(HyperliquidConfig {
            base_url: "http://localhost:3000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.info_url(), "http://localhost:3000/info");
    }

    #[test]
    fn test_parse_meta_and_contexts() {
        let response = json!([
            {
                "universe": [
                    {"name": "BTC", "szDecimals": 5, "maxLeverage": 50},
                    {"name": "SOL", "szDecimals": 2, "maxLeverage": 20},
                    {"name": "WIF", "szDecimals": 0, "maxLeverage": 5}
                ]
            },
            [
                {"dayNtlVlm": "1000000000.5", "markPx": "95000.0", "funding": "0.0001"},
                {"dayNtlVlm": "250000000.0", "markPx": "180.25"}
            ]
        ]);

        let (meta, contexts) = parse_meta_and_contexts(response).unwrap();
        let assets = pair_assets(meta.universe, contexts);

        // WIF has no context and is dropped
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].name, "SOL");
        assert_eq!(assets[1].volume_24h, dec!(250000000.0));
        assert_eq!(assets[1].price, dec!(180.25));
    }

    #[test]
    fn test_parse_meta_and_contexts_wrong_shape() {
        assert!(parse_meta_and_contexts(json!({"universe": []})).is_err());
        assert!(parse_meta_and_contexts(json!([{"universe": []}])).is_err());
    }

    #[test]
    fn test_missing_numerics_default_to_zero() {
        let universe = vec![UniverseAsset {
            name: Some("SOL".to_string()),
            is_delisted: false,
            only_isolated: false,
            max_leverage: 20,
            margin_table_id: 51,
        }];
        let contexts = vec![AssetContext {
            day_ntl_vlm: None,
            mark_px: Some("garbage".to_string()),
        }];

        let assets = pair_assets(universe, contexts);
        assert_eq!(assets[0].volume_24h, Decimal::ZERO);
        assert_eq!(assets[0].price, Decimal::ZERO);
    }

    #[test]
    fn test_unnamed_asset_dropped() {
        let universe = vec![UniverseAsset {
            name: None,
            is_delisted: false,
            only_isolated: false,
            max_leverage: 0,
            margin_table_id: 0,
        }];
        assert!(pair_assets(universe, vec![AssetContext::default()]).is_empty());
    }

    #[test]
    fn test_parse_candles() {
        let raw = vec![
            json!({"t": 1704067200000i64, "T": 1704070799999i64, "s": "SOL", "i": "1h",
                   "o": "100.0", "c": "101.5", "h": "102.0", "l": "99.5", "v": "12345.6", "n": 420}),
            json!({"t": 1704070800000i64, "o": "101.5", "c": "not_a_number",
                   "h": "103.0", "l": "101.0", "v": "1.0"}),
            json!({"t": 1704074400000i64, "o": "101.5", "h": "103.0", "l": "101.0", "v": "1.0"}),
            json!("garbage"),
        ];

        let candles = parse_candles(raw);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 101.5);
        assert_eq!(candles[0].volume, 12345.6);
        assert_eq!(candles[0].timestamp.timestamp_millis(), 1_704_067_200_000);
    }

    #[test]
    fn test_universe_asset_deserialize() {
        let asset: UniverseAsset = serde_json::from_value(json!({
            "name": "HYPE",
            "maxLeverage": 10,
            "marginTableId": 52,
            "onlyIsolated": false
        }))
        .unwrap();

        assert_eq!(asset.name.as_deref(), Some("HYPE"));
        assert!(!asset.is_delisted);
        assert_eq!(asset.max_leverage, 10);
        assert_eq!(asset.margin_table_id, 52);
    }

    #[tokio::test]
    async fn test_rate_limit_spaces_requests() {
        let client = HyperliquidClient::with_config(HyperliquidConfig {
            min_request_interval: Duration::from_millis(30),
            ..Default::default()
        })
        .unwrap();

        let start = std::time::Instant::now();
        client.rate_limit().await;
        client.rate_limit().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
