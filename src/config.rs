//! Configuration types for vol-spike

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::market::HYPERLIQUID_API_URL;

/// Root configuration structure
///
/// Every section and field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sigma_threshold must be positive, got {0}")]
    SigmaThreshold(f64),
    #[error("z_score_threshold must be positive, got {0}")]
    ZScoreThreshold(f64),
    #[error("update_interval_minutes must be positive")]
    UpdateInterval,
    #[error("volume periods must be > 1, got {0}")]
    VolumePeriods(usize),
    #[error("ema_periods must be positive")]
    EmaPeriods,
    #[error("max_instruments must be positive when set")]
    MaxInstruments,
    #[error("invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },
}

/// Volume anomaly detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeConfig {
    /// Rolling window length per instrument
    #[serde(default = "default_volume_periods")]
    pub periods: usize,

    /// Minimum sigma deviation for a spike
    #[serde(default = "default_threshold")]
    pub sigma_threshold: f64,

    /// Minimum z-score for a spike
    #[serde(default = "default_threshold")]
    pub z_score_threshold: f64,

    /// Bound on tracked instruments for both analyzers (unbounded when absent)
    #[serde(default)]
    pub max_instruments: Option<usize>,
}

fn default_volume_periods() -> usize {
    20
}
fn default_threshold() -> f64 {
    2.0
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            periods: 20,
            sigma_threshold: 2.0,
            z_score_threshold: 2.0,
            max_instruments: None,
        }
    }
}

/// EMA momentum confirmation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MomentumConfig {
    /// EMA length over hourly closes
    #[serde(default = "default_ema_periods")]
    pub ema_periods: usize,

    /// Reject spikes where the latest close is not above the EMA
    #[serde(default = "default_true")]
    pub price_above_ema_required: bool,

    /// Check the EMA slope; a rising slope is reported as a condition
    #[serde(default = "default_true")]
    pub ema_slope_filter_enabled: bool,

    /// Also reject spikes whose EMA is computed as not rising
    #[serde(default)]
    pub ema_slope_strict: bool,
}

fn default_ema_periods() -> usize {
    21
}
fn default_true() -> bool {
    true
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            ema_periods: 21,
            price_above_ema_required: true,
            ema_slope_filter_enabled: true,
            ema_slope_strict: false,
        }
    }
}

/// Asset universe filtering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Only analyze tokens listed in the strict list file
    #[serde(default = "default_true")]
    pub strict_list_enabled: bool,

    /// JSON array of token names
    #[serde(default = "default_strict_list_path")]
    pub strict_list_path: PathBuf,

    /// Minimum 24h notional volume (USD); lower is treated as inactive
    #[serde(default = "default_min_volume_24h")]
    pub min_volume_24h: Decimal,

    /// Tokens never analyzed
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,
}

fn default_strict_list_path() -> PathBuf {
    PathBuf::from("strict_list.json")
}
fn default_min_volume_24h() -> Decimal {
    Decimal::new(1000, 0)
}
fn default_excluded() -> Vec<String> {
    vec!["BTC".to_string(), "ETH".to_string()]
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strict_list_enabled: true,
            strict_list_path: default_strict_list_path(),
            min_volume_24h: default_min_volume_24h(),
            excluded: default_excluded(),
        }
    }
}

/// Polling schedule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between cycles
    #[serde(default = "default_update_interval")]
    pub update_interval_minutes: u64,

    /// Seconds to wait after a failed cycle
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Log progress every N assets
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_update_interval() -> u64 {
    15
}
fn default_retry_delay_secs() -> u64 {
    30
}
fn default_progress_every() -> usize {
    25
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            update_interval_minutes: 15,
            retry_delay_secs: 30,
            progress_every: 25,
        }
    }
}

/// Hyperliquid client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between requests
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Additional attempts after a failure
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String {
    HYPERLIQUID_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_min_request_interval_ms() -> u64 {
    50
}
fn default_retries() -> u32 {
    1
}
fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: 10,
            min_request_interval_ms: 50,
            retries: 1,
            retry_delay_ms: 1000,
        }
    }
}

/// Alert delivery configuration
///
/// Telegram is used only when both fields are set; `BOT_TOKEN` and `CHAT_ID`
/// environment variables take precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl AlertConfig {
    /// Fill credentials from `BOT_TOKEN` / `CHAT_ID` when set
    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("BOT_TOKEN").filter(|v| !v.is_empty()) {
            self.bot_token = Some(token);
        }
        if let Some(chat_id) = lookup("CHAT_ID").filter(|v| !v.is_empty()) {
            self.chat_id = Some(chat_id);
        }
    }

    /// Both Telegram credentials present
    pub fn telegram_configured(&self) -> bool {
        matches!((&self.bot_token, &self.chat_id), (Some(t), Some(c)) if !t.is_empty() && !c.is_empty())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn override_value<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(());
    };
    *target = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value: raw.clone() })?;
    Ok(())
}

/// Any value other than `true` (case-insensitive) turns the flag off
fn override_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut bool) {
    if let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) {
        *target = raw.trim().eq_ignore_ascii_case("true");
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port (disabled when absent)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides on top of the file
    ///
    /// Reads `SIGMA_THRESHOLD`, `Z_SCORE_THRESHOLD`, `VOLUME_PERIODS`,
    /// `UPDATE_INTERVAL_MINUTES`, `EMA_PERIODS`, `PRICE_ABOVE_EMA_REQUIRED`,
    /// `EMA_SLOPE_FILTER_ENABLED`, `STRICT_LIST_ENABLED`, `BOT_TOKEN` and
    /// `CHAT_ID`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(non_empty_env)
    }

    /// Apply overrides from `lookup` instead of the process environment
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        override_value(&lookup, "SIGMA_THRESHOLD", &mut self.volume.sigma_threshold)?;
        override_value(&lookup, "Z_SCORE_THRESHOLD", &mut self.volume.z_score_threshold)?;
        override_value(&lookup, "VOLUME_PERIODS", &mut self.volume.periods)?;
        override_value(
            &lookup,
            "UPDATE_INTERVAL_MINUTES",
            &mut self.schedule.update_interval_minutes,
        )?;
        override_value(&lookup, "EMA_PERIODS", &mut self.momentum.ema_periods)?;

        override_flag(
            &lookup,
            "PRICE_ABOVE_EMA_REQUIRED",
            &mut self.momentum.price_above_ema_required,
        );
        override_flag(
            &lookup,
            "EMA_SLOPE_FILTER_ENABLED",
            &mut self.momentum.ema_slope_filter_enabled,
        );
        override_flag(&lookup, "STRICT_LIST_ENABLED", &mut self.filter.strict_list_enabled);

        self.alert.apply_env_from(&lookup);
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.volume.sigma_threshold <= 0.0 {
            return Err(ConfigError::SigmaThreshold(self.volume.sigma_threshold));
        }
        if self.volume.z_score_threshold <= 0.0 {
            return Err(ConfigError::ZScoreThreshold(self.volume.z_score_threshold));
        }
        if self.schedule.update_interval_minutes == 0 {
            return Err(ConfigError::UpdateInterval);
        }
        if self.volume.periods <= 1 {
            return Err(ConfigError::VolumePeriods(self.volume.periods));
        }
        if self.momentum.ema_periods == 0 {
            return Err(ConfigError::EmaPeriods);
        }
        if self.volume.max_instruments == Some(0) {
            return Err(ConfigError::MaxInstruments);
        }
        Ok(())
    }
}
