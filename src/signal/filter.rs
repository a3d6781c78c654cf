//! Spike and momentum filters

use super::{MomentumCondition, RejectReason};
use crate::config::{MomentumConfig, VolumeConfig};
use crate::momentum::{EmaSlope, EmaStats};
use crate::volume::VolumeStats;

/// Result of applying the momentum filters
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    /// Confirmed, with the conditions that were checked and held
    Pass(Vec<MomentumCondition>),
    /// Rejected
    Reject(RejectReason),
}

/// Thresholds and policy toggles
#[derive(Debug, Clone)]
pub struct SpikeFilterConfig {
    pub sigma_threshold: f64,
    pub z_score_threshold: f64,
    pub price_above_ema_required: bool,
    pub ema_slope_filter_enabled: bool,
    pub ema_slope_strict: bool,
}

impl Default for SpikeFilterConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: 2.0,
            z_score_threshold: 2.0,
            price_above_ema_required: true,
            ema_slope_filter_enabled: true,
            ema_slope_strict: false,
        }
    }
}

impl SpikeFilterConfig {
    pub fn from_config(volume: &VolumeConfig, momentum: &MomentumConfig) -> Self {
        Self {
            sigma_threshold: volume.sigma_threshold,
            z_score_threshold: volume.z_score_threshold,
            price_above_ema_required: momentum.price_above_ema_required,
            ema_slope_filter_enabled: momentum.ema_slope_filter_enabled,
            ema_slope_strict: momentum.ema_slope_strict,
        }
    }
}

/// Volume spike check followed by momentum confirmation
pub struct SpikeFilter {
    config: SpikeFilterConfig,
}

impl SpikeFilter {
    /// Create a new filter with given configuration
    pub fn new(config: SpikeFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpikeFilterConfig {
        &self.config
    }

    /// Both volume scores at or above their thresholds
    pub fn is_volume_spike(&self, stats: &VolumeStats) -> bool {
        stats.is_spike(self.config.sigma_threshold, self.config.z_score_threshold)
    }

    /// Apply the momentum policies to an EMA reading
    ///
    /// With the slope filter enabled a rising EMA adds a condition. A
    /// not-rising or unknown slope passes without one, unless
    /// `ema_slope_strict` is set, in which case a computed not-rising slope
    /// rejects.
    pub fn check_momentum(&self, ema: &EmaStats) -> FilterResult {
        let mut conditions = Vec::new();

        if self.config.price_above_ema_required {
            if !ema.price_above_ema {
                return FilterResult::Reject(RejectReason::PriceBelowEma);
            }
            conditions.push(MomentumCondition::PriceAboveEma);
        }

        if self.config.ema_slope_filter_enabled {
            match ema.slope {
                EmaSlope::Rising => conditions.push(MomentumCondition::EmaRising),
                EmaSlope::NotRising if self.config.ema_slope_strict => {
                    return FilterResult::Reject(RejectReason::EmaNotRising)
                }
                EmaSlope::NotRising | EmaSlope::Unknown => {}
            }
        }

        FilterResult::Pass(conditions)
    }
}

impl Default for SpikeFilter {
    fn default() -> Self {
        Self::new(SpikeFilterConfig::default())
    }
}
