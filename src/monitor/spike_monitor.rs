//! Volume spike + momentum monitor

use super::{AssetFilter, CycleSummary, Evaluation, Shutdown};
use crate::alert::{Alert, AlertDispatcher};
use crate::config::{Config, FilterConfig, ScheduleConfig};
use crate::market::{AssetSnapshot, ClientError, MarketData};
use crate::momentum::{MomentumAnalyzer, MomentumAnalyzerConfig};
use crate::signal::{FilterResult, RejectReason, SpikeFilter, SpikeFilterConfig};
use crate::telemetry;
use crate::volume::{VolumeAnomalyDetector, VolumeDetectorConfig, VolumeStats};
use rust_decimal::prelude::ToPrimitive;
use std::time::{Duration, Instant};

/// Candles fetched beyond `ema_periods`
const CANDLE_BUFFER: usize = 5;

/// Runs detection cycles over every perpetual returned by `M`
pub struct SpikeMonitor<M: MarketData> {
    market: M,
    alerts: AlertDispatcher,
    volume: VolumeAnomalyDetector,
    momentum: MomentumAnalyzer,
    spike_filter: SpikeFilter,
    asset_filter: FilterConfig,
    schedule: ScheduleConfig,
}

impl<M: MarketData> SpikeMonitor<M> {
    /// Create a monitor from configuration
    pub fn new(market: M, alerts: AlertDispatcher, config: &Config) -> Self {
        let volume = VolumeAnomalyDetector::new(VolumeDetectorConfig::from(config));
        let momentum = MomentumAnalyzer::new(MomentumAnalyzerConfig::from(config));
        let spike_filter =
            SpikeFilter::new(SpikeFilterConfig::from_config(&config.volume, &config.momentum));

        Self {
            market,
            alerts,
            volume,
            momentum,
            spike_filter,
            asset_filter: config.filter.clone(),
            schedule: config.schedule.clone(),
        }
    }

    pub fn volume_detector(&self) -> &VolumeAnomalyDetector {
        &self.volume
    }

    pub fn momentum_analyzer(&self) -> &MomentumAnalyzer {
        &self.momentum
    }

    /// Run the volume check and, for spikes, the momentum check
    pub async fn evaluate(&mut self, asset: &AssetSnapshot) -> Result<Evaluation, ClientError> {
        match self.check_volume(asset) {
            Ok(volume_stats) => self.confirm_momentum(asset, volume_stats).await,
            Err(reason) => Ok(Evaluation::Skipped(reason)),
        }
    }

    /// Record the asset's volume and score it; `Ok` only for spikes
    pub fn check_volume(&mut self, asset: &AssetSnapshot) -> Result<VolumeStats, RejectReason> {
        let name = asset.name.as_str();
        let volume = asset.volume_24h.to_f64().unwrap_or(0.0);

        self.volume.update(name, volume);

        if !self.volume.has_sufficient_data(name) {
            return Err(RejectReason::InsufficientVolumeHistory);
        }

        let volume_stats = self
            .volume
            .calculate_stats(name, volume)
            .ok_or(RejectReason::DegenerateVolume)?;

        if !self.spike_filter.is_volume_spike(&volume_stats) {
            return Err(RejectReason::NoVolumeSpike(volume_stats.sigma_deviation));
        }

        metrics::counter!("volspike_volume_spikes_total").increment(1);
        tracing::debug!(
            token = name,
            sigma = volume_stats.sigma_deviation,
            mean_volume = volume_stats.mean_volume,
            "Volume spike, checking momentum"
        );

        Ok(volume_stats)
    }

    /// Fetch candles for a spiking asset and apply the momentum filters
    pub async fn confirm_momentum(
        &mut self,
        asset: &AssetSnapshot,
        volume_stats: VolumeStats,
    ) -> Result<Evaluation, ClientError> {
        let name = asset.name.as_str();
        let ema_periods = self.momentum.ema_periods();
        let candles = self
            .market
            .fetch_candles(name, ema_periods + CANDLE_BUFFER)
            .await?;

        if candles.is_empty() {
            tracing::warn!(token = name, "No candle data, skipping momentum analysis");
            return Ok(Evaluation::Skipped(RejectReason::NoCandles));
        }

        self.momentum.update(name, &candles);

        if !self.momentum.has_sufficient_data(name) {
            return Ok(Evaluation::Skipped(RejectReason::InsufficientPriceHistory));
        }

        let Some(ema_stats) = self.momentum.calculate_ema(name) else {
            return Ok(Evaluation::Skipped(RejectReason::InsufficientPriceHistory));
        };

        match self.spike_filter.check_momentum(&ema_stats) {
            FilterResult::Reject(reason) => {
                tracing::debug!(token = name, %reason, "Momentum filter rejected spike");
                Ok(Evaluation::Skipped(reason))
            }
            FilterResult::Pass(conditions) => {
                let alert = Alert::new(
                    asset.clone(),
                    volume_stats,
                    ema_stats,
                    ema_periods,
                    conditions,
                );
                tracing::info!(
                    token = name,
                    conditions = %alert.conditions_summary(),
                    "Volume spike + momentum confirmed"
                );
                Ok(Evaluation::Alert(Box::new(alert)))
            }
        }
    }

    /// Fetch, filter and evaluate every asset once
    pub async fn run_cycle(&mut self) -> Result<CycleSummary, ClientError> {
        let start = Instant::now();
        tracing::info!("Fetching token data");

        let assets = self.market.fetch_assets().await?;
        let assets_fetched = assets.len();

        let filter = AssetFilter::from_config(&self.asset_filter);
        match filter.strict_list() {
            Some(strict) => {
                if strict.is_empty() {
                    tracing::warn!("Strict list enabled but empty, no tokens will be analyzed");
                }
                tracing::info!(
                    strict_list = strict.len(),
                    fetched = assets_fetched,
                    "Filtering by strict list"
                );
            }
            None => tracing::info!(fetched = assets_fetched, "Monitoring all available tokens"),
        }

        let assets = filter.apply(assets);
        let mut summary = CycleSummary {
            assets_fetched,
            assets_analyzed: assets.len(),
            ..Default::default()
        };

        tracing::info!(count = assets.len(), "Analyzing tokens (volume + momentum)");

        for (i, asset) in assets.iter().enumerate() {
            let outcome = match self.check_volume(asset) {
                Ok(volume_stats) => {
                    summary.volume_spikes += 1;
                    self.confirm_momentum(asset, volume_stats).await
                }
                Err(reason) => Ok(Evaluation::Skipped(reason)),
            };

            match outcome {
                Ok(Evaluation::Alert(alert)) => {
                    summary.alerts_sent += 1;
                    self.alerts.dispatch(&alert).await;
                }
                Ok(Evaluation::Skipped(reason)) => {
                    tracing::trace!(token = %asset.name, %reason, "Skipped");
                }
                Err(e) => {
                    summary.errors += 1;
                    tracing::warn!(token = %asset.name, error = %e, "Error analyzing token");
                }
            }

            let processed = i + 1;
            if self.schedule.progress_every > 0 && processed % self.schedule.progress_every == 0 {
                tracing::info!(
                    processed,
                    total = assets.len(),
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "Progress"
                );
            }
        }

        summary.elapsed = start.elapsed();

        metrics::counter!("volspike_cycles_total").increment(1);
        metrics::gauge!("volspike_tracked_instruments").set(self.volume.tracked_instruments() as f64);
        telemetry::record_cycle(&summary);

        if summary.alerts_sent > 0 {
            tracing::info!(
                alerts = summary.alerts_sent,
                elapsed_secs = summary.elapsed.as_secs_f64(),
                "Sent volume spike + momentum alerts"
            );
        } else {
            tracing::info!(
                elapsed_secs = summary.elapsed.as_secs_f64(),
                "No significant volume spikes with positive momentum detected"
            );
        }

        Ok(summary)
    }

    /// Run cycles until `shutdown` fires
    ///
    /// Waits `update_interval_minutes` after a successful cycle and
    /// `retry_delay_secs` after a failed one.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> anyhow::Result<()> {
        let interval = Duration::from_secs(self.schedule.update_interval_minutes * 60);
        let retry_delay = Duration::from_secs(self.schedule.retry_delay_secs);
        let mut cycle: u64 = 0;

        while !*shutdown.borrow() {
            cycle += 1;
            tracing::info!(cycle, "Starting cycle");

            let result = tokio::select! {
                result = self.run_cycle() => result,
                _ = shutdown.changed() => break,
            };

            let wait = match result {
                Ok(_) => {
                    tracing::info!(
                        minutes = self.schedule.update_interval_minutes,
                        "Waiting until next cycle"
                    );
                    interval
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        retry_secs = self.schedule.retry_delay_secs,
                        "Cycle failed, retrying"
                    );
                    retry_delay
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!(cycles = cycle, "Monitor shutdown complete");
        Ok(())
    }
}
