//! Rolling volume anomaly detector

use crate::config::Config;
use crate::stats::{self, InstrumentRegistry, RollingWindow};

use super::types::VolumeStats;

/// Minimum observations before any statistics are produced
pub const MIN_VOLUME_OBSERVATIONS: usize = 5;

/// Configuration for the volume detector
#[derive(Debug, Clone)]
pub struct VolumeDetectorConfig {
    /// Rolling window capacity per instrument (default: 20)
    pub periods: usize,

    /// Optional bound on tracked instruments, least recently used evicted first
    pub max_instruments: Option<usize>,
}

impl Default for VolumeDetectorConfig {
    fn default() -> Self {
        Self {
            periods: 20,
            max_instruments: None,
        }
    }
}

impl From<&Config> for VolumeDetectorConfig {
    fn from(config: &Config) -> Self {
        Self {
            periods: config.volume.periods,
            max_instruments: config.volume.max_instruments,
        }
    }
}

/// Scores volume observations against a per-instrument rolling baseline
///
/// Once an instrument's window is full, the most recent observation is left
/// out of its own baseline. Before that the baseline is the whole window,
/// current observation included.
pub struct VolumeAnomalyDetector {
    config: VolumeDetectorConfig,
    windows: InstrumentRegistry<RollingWindow<f64>>,
}

impl VolumeAnomalyDetector {
    /// Create a detector with the given configuration
    pub fn new(config: VolumeDetectorConfig) -> Self {
        let windows = match config.max_instruments {
            Some(max) => InstrumentRegistry::with_max_entries(max),
            None => InstrumentRegistry::new(),
        };
        Self { config, windows }
    }

    /// Create a detector with default configuration
    pub fn with_defaults() -> Self {
        Self::new(VolumeDetectorConfig::default())
    }

    /// Window capacity
    pub fn periods(&self) -> usize {
        self.config.periods
    }

    /// Record a volume observation
    pub fn update(&mut self, instrument: &str, volume: f64) {
        let periods = self.config.periods;
        self.windows
            .get_or_create(instrument, || RollingWindow::new(periods))
            .push(volume);
    }

    /// Check if the instrument has enough observations for statistics
    pub fn has_sufficient_data(&self, instrument: &str) -> bool {
        self.observation_count(instrument) >= MIN_VOLUME_OBSERVATIONS
    }

    /// Number of observations currently held for the instrument
    pub fn observation_count(&self, instrument: &str) -> usize {
        self.windows.get(instrument).map_or(0, RollingWindow::len)
    }

    /// Observations held for the instrument, oldest first
    pub fn history(&self, instrument: &str) -> Vec<f64> {
        self.windows
            .get(instrument)
            .map(RollingWindow::to_vec)
            .unwrap_or_default()
    }

    /// Number of instruments with state
    pub fn tracked_instruments(&self) -> usize {
        self.windows.len()
    }

    /// Score `current_volume` against the instrument's baseline
    ///
    /// Returns `None` with fewer than five observations or when the baseline
    /// has zero standard deviation.
    pub fn calculate_stats(&self, instrument: &str, current_volume: f64) -> Option<VolumeStats> {
        let window = self.windows.get(instrument)?;
        if window.len() < MIN_VOLUME_OBSERVATIONS {
            return None;
        }

        let history = window.to_vec();
        let baseline = if window.is_full() {
            &history[..history.len() - 1]
        } else {
            &history[..]
        };

        let mean_volume = stats::mean(baseline)?;
        let std_volume = stats::population_std(baseline)?;

        if std_volume == 0.0 {
            return None;
        }

        let sigma_deviation = (current_volume - mean_volume) / std_volume;

        Some(VolumeStats {
            sigma_deviation,
            z_score: sigma_deviation,
            mean_volume,
            current_volume,
            periods_analyzed: baseline.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(periods: usize) -> VolumeAnomalyDetector {
        VolumeAnomalyDetector::new(VolumeDetectorConfig {
            periods,
            max_instruments: None,
        })
    }

    #[test]
    fn test_config_from_app_config() {
        let mut config = Config::default();
        config.volume.periods = 7;
        config.volume.max_instruments = Some(2);

        let mut detector = VolumeAnomalyDetector::new(VolumeDetectorConfig::from(&config));
        assert_eq!(detector.periods(), 7);

        for name in ["SOL", "DOGE", "WIF"] {
            detector.update(name, 1000.0);
        }
        assert_eq!(detector.tracked_instruments(), 2);
        assert_eq!(detector.observation_count("SOL"), 0);
    }

    #[test]
    fn test_new_detector() {
        let detector = VolumeAnomalyDetector::with_defaults();
        assert_eq!(detector.periods(), 20);
        assert_eq!(detector.tracked_instruments(), 0);
        assert!(!detector.has_sufficient_data("SOL"));
    }

    #[test]
    fn test_queries_do_not_create_state() {
        let detector = detector(20);
        assert!(detector.calculate_stats("SOL", 100.0).is_none());
        assert_eq!(detector.observation_count("SOL"), 0);
        assert_eq!(detector.tracked_instruments(), 0);
    }

    #[test]
    fn test_update_creates_state() {
        let mut detector = detector(20);
        detector.update("SOL", 100.0);
        assert_eq!(detector.tracked_instruments(), 1);
        assert_eq!(detector.observation_count("SOL"), 1);
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let mut detector = detector(20);
        for v in [100.0, 200.0, 300.0, 400.0] {
            detector.update("SOL", v);
        }

        assert!(!detector.has_sufficient_data("SOL"));
        for current in [0.0, 250.0, 1e12] {
            assert!(detector.calculate_stats("SOL", current).is_none());
        }
    }

    #[test]
    fn test_sufficient_data_at_five() {
        let mut detector = detector(20);
        for v in [100.0, 200.0, 300.0, 400.0, 500.0] {
            detector.update("SOL", v);
        }
        assert!(detector.has_sufficient_data("SOL"));
    }

    #[test]
    fn test_zero_variance_returns_none() {
        let mut detector = detector(20);
        for _ in 0..10 {
            detector.update("SOL", 500.0);
        }
        assert!(detector.calculate_stats("SOL", 500.0).is_none());
        assert!(detector.calculate_stats("SOL", 5000.0).is_none());
    }

    #[test]
    fn test_full_window_excludes_current_from_baseline() {
        let mut detector = detector(5);
        for _ in 0..5 {
            detector.update("SOL", 100.0);
        }
        // Window [100; 5] is full, baseline is the first four: std = 0
        detector.update("SOL", 100.0);
        assert!(detector.calculate_stats("SOL", 100.0).is_none());
    }

    #[test]
    fn test_full_window_baseline_drops_spike() {
        let mut detector = detector(5);
        for v in [100.0, 200.0, 100.0, 200.0] {
            detector.update("SOL", v);
        }
        detector.update("SOL", 1000.0);

        let stats = detector.calculate_stats("SOL", 1000.0).unwrap();
        // Baseline [100, 200, 100, 200]: mean 150, std 50
        assert_eq!(stats.periods_analyzed, 4);
        assert_eq!(stats.mean_volume, 150.0);
        assert!((stats.sigma_deviation - 17.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_window_includes_current_in_baseline() {
        let mut detector = detector(20);
        for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
            detector.update("SOL", v);
        }

        let stats = detector.calculate_stats("SOL", 50.0).unwrap();
        // Baseline is the whole window: mean 30, std sqrt(200)
        assert_eq!(stats.periods_analyzed, 5);
        assert_eq!(stats.mean_volume, 30.0);
        assert!((stats.sigma_deviation - 20.0 / 200f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_three_sigma_at_capacity_twenty() {
        let mut detector = detector(20);

        // 19 baseline values with mean 1000 and population std 100
        let d = 100.0 * (19.0_f64 / 18.0).sqrt();
        let mut baseline: Vec<f64> = (0..18)
            .map(|i| if i % 2 == 0 { 1000.0 + d } else { 1000.0 - d })
            .collect();
        baseline.push(1000.0);
        assert!((stats::population_std(&baseline).unwrap() - 100.0).abs() < 1e-9);

        for v in &baseline {
            detector.update("SOL", *v);
        }
        detector.update("SOL", 1300.0);

        let stats = detector.calculate_stats("SOL", 1300.0).unwrap();
        assert_eq!(stats.periods_analyzed, 19);
        assert!((stats.mean_volume - 1000.0).abs() < 1e-9);
        assert!((stats.sigma_deviation - 3.0).abs() < 1e-9);
        assert_eq!(stats.z_score, stats.sigma_deviation);
        assert_eq!(stats.current_volume, 1300.0);
    }

    #[test]
    fn test_window_eviction() {
        let mut detector = detector(20);
        for i in 0..23 {
            detector.update("SOL", i as f64);
        }

        let history = detector.history("SOL");
        assert_eq!(history.len(), 20);
        assert_eq!(history.first(), Some(&3.0));
        assert_eq!(history.last(), Some(&22.0));
    }

    #[test]
    fn test_instruments_are_independent() {
        let mut detector = detector(20);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            detector.update("SOL", v);
        }
        detector.update("DOGE", 1.0);

        assert!(detector.has_sufficient_data("SOL"));
        assert!(!detector.has_sufficient_data("DOGE"));
    }

    #[test]
    fn test_max_instruments_evicts_lru() {
        let mut detector = VolumeAnomalyDetector::new(VolumeDetectorConfig {
            periods: 20,
            max_instruments: Some(2),
        });
        detector.update("A", 1.0);
        detector.update("B", 1.0);
        detector.update("A", 2.0);
        detector.update("C", 1.0);

        assert_eq!(detector.tracked_instruments(), 2);
        assert_eq!(detector.observation_count("A"), 2);
        assert_eq!(detector.observation_count("B"), 0);
    }
}
