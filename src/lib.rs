//! vol-spike: Volume spike + EMA momentum alerts for Hyperliquid perpetuals
//!
//! This library provides the core components for:
//! - Market data from the Hyperliquid info API
//! - Rolling volume baselines with sigma / z-score spike detection
//! - EMA momentum confirmation from hourly candles
//! - Spike and momentum filtering
//! - Alert delivery to Telegram or the console
//! - The polling monitor and strict-list maintenance
//! - Logging and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod market;
pub mod momentum;
pub mod monitor;
pub mod signal;
pub mod stats;
pub mod telemetry;
pub mod volume;
