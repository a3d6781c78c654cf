//! Prometheus metrics

use crate::monitor::CycleSummary;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Per-cycle metric types
#[derive(Debug, Clone, Copy)]
pub enum CycleMetric {
    /// Assets returned by the exchange
    AssetsFetched,
    /// Assets that passed selection
    AssetsAnalyzed,
    /// Assets whose volume exceeded both thresholds
    VolumeSpikes,
    /// Alerts delivered
    AlertsSent,
    /// Per-asset errors
    Errors,
    /// Wall-clock cycle duration
    DurationSeconds,
}

impl CycleMetric {
    fn name(self) -> &'static str {
        match self {
            CycleMetric::AssetsFetched => "volspike_cycle_assets_fetched",
            CycleMetric::AssetsAnalyzed => "volspike_cycle_assets_analyzed",
            CycleMetric::VolumeSpikes => "volspike_cycle_volume_spikes",
            CycleMetric::AlertsSent => "volspike_cycle_alerts_sent",
            CycleMetric::Errors => "volspike_cycle_errors",
            CycleMetric::DurationSeconds => "volspike_cycle_duration_seconds",
        }
    }
}

/// Install the Prometheus exporter on `0.0.0.0:port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Publish the last cycle's summary as gauges
pub fn record_cycle(summary: &CycleSummary) {
    let values = [
        (CycleMetric::AssetsFetched, summary.assets_fetched as f64),
        (CycleMetric::AssetsAnalyzed, summary.assets_analyzed as f64),
        (CycleMetric::VolumeSpikes, summary.volume_spikes as f64),
        (CycleMetric::AlertsSent, summary.alerts_sent as f64),
        (CycleMetric::Errors, summary.errors as f64),
        (CycleMetric::DurationSeconds, summary.elapsed.as_secs_f64()),
    ];

    for (metric, value) in values {
        ::metrics::gauge!(metric.name()).set(value);
    }
}
