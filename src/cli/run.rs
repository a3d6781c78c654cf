//! Run command implementation

use crate::config::Config;
use crate::monitor::{shutdown_channel, wait_for_signal};
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut monitor = super::build_monitor(config)?;
        let (tx, rx) = shutdown_channel();

        tokio::spawn(async move {
            wait_for_signal().await;
            let _ = tx.send(true);
        });

        tracing::info!(
            interval_minutes = config.schedule.update_interval_minutes,
            sigma_threshold = config.volume.sigma_threshold,
            ema_periods = config.momentum.ema_periods,
            "Starting volume spike monitor"
        );

        monitor.run(rx).await
    }
}
