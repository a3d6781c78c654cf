//! Volume statistics types

use serde::{Deserialize, Serialize};

/// Deviation of the current volume from its rolling baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStats {
    /// Standard deviations above the baseline mean
    pub sigma_deviation: f64,

    /// Standardised score; computed from the same baseline as `sigma_deviation`
    pub z_score: f64,

    /// Mean of the baseline set
    pub mean_volume: f64,

    /// Observation being scored
    pub current_volume: f64,

    /// Size of the baseline set
    pub periods_analyzed: usize,
}

impl VolumeStats {
    /// Both scores at or above their thresholds
    pub fn is_spike(&self, sigma_threshold: f64, z_score_threshold: f64) -> bool {
        self.sigma_deviation >= sigma_threshold && self.z_score >= z_score_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(score: f64) -> VolumeStats {
        VolumeStats {
            sigma_deviation: score,
            z_score: score,
            mean_volume: 1000.0,
            current_volume: 1000.0 + score * 100.0,
            periods_analyzed: 19,
        }
    }

    #[test]
    fn test_is_spike_at_threshold() {
        assert!(stats(2.0).is_spike(2.0, 2.0));
    }

    #[test]
    fn test_is_spike_uses_stricter_bound() {
        assert!(!stats(2.5).is_spike(2.0, 3.0));
        assert!(!stats(2.5).is_spike(3.0, 2.0));
        assert!(stats(3.5).is_spike(2.0, 3.0));
    }

    #[test]
    fn test_negative_deviation_is_not_spike() {
        assert!(!stats(-4.0).is_spike(2.0, 2.0));
    }
}
