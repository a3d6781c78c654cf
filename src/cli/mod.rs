//! CLI interface for vol-spike
//!
//! Provides subcommands for:
//! - `run`: Monitor continuously until interrupted
//! - `once`: Run a single detection cycle
//! - `strict-list`: Rebuild the strict token list from exchange metadata
//! - `config`: Show effective configuration

mod once;
mod run;
mod strict_list;

pub use once::OnceArgs;
pub use run::RunArgs;
pub use strict_list::StrictListArgs;

use crate::alert::AlertDispatcher;
use crate::config::Config;
use crate::market::{HyperliquidClient, HyperliquidConfig};
use crate::monitor::SpikeMonitor;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vol-spike")]
#[command(about = "Volume spike + EMA momentum alerts for Hyperliquid perpetuals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor continuously
    Run(RunArgs),
    /// Run one detection cycle and exit
    Once(OnceArgs),
    /// Rebuild the strict token list
    StrictList(StrictListArgs),
    /// Show configuration
    Config,
}

fn build_monitor(config: &Config) -> anyhow::Result<SpikeMonitor<HyperliquidClient>> {
    let client = HyperliquidClient::with_config(HyperliquidConfig::from(&config.client))?;
    let alerts = AlertDispatcher::from_config(&config.alert)?;
    Ok(SpikeMonitor::new(client, alerts, config))
}

/// Print the effective configuration
pub fn print_config(config: &Config) {
    println!("Current configuration:");
    println!(
        "  Volume: periods={}, sigma>={}, z>={}",
        config.volume.periods, config.volume.sigma_threshold, config.volume.z_score_threshold
    );
    println!(
        "  Momentum: EMA-{}, price above EMA={}, slope filter={} (strict={})",
        config.momentum.ema_periods,
        config.momentum.price_above_ema_required,
        config.momentum.ema_slope_filter_enabled,
        config.momentum.ema_slope_strict
    );
    println!(
        "  Filter: strict list={} ({}), min 24h volume=${}, excluded={}",
        config.filter.strict_list_enabled,
        config.filter.strict_list_path.display(),
        config.filter.min_volume_24h,
        config.filter.excluded.join(",")
    );
    println!(
        "  Schedule: every {} min, retry after {}s",
        config.schedule.update_interval_minutes, config.schedule.retry_delay_secs
    );
    println!(
        "  Alerts: {}",
        if config.alert.telegram_configured() {
            "Telegram"
        } else {
            "console"
        }
    );
}
