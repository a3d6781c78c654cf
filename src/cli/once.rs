//! Once command implementation

use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct OnceArgs {}

impl OnceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut monitor = super::build_monitor(config)?;
        let summary = monitor.run_cycle().await?;

        println!(
            "Fetched {} assets, analyzed {}, {} volume spikes, {} alerts, {} errors in {:.1}s",
            summary.assets_fetched,
            summary.assets_analyzed,
            summary.volume_spikes,
            summary.alerts_sent,
            summary.errors,
            summary.elapsed.as_secs_f64()
        );
        Ok(())
    }
}
