//! EMA momentum analyzer

use crate::config::Config;
use crate::market::Candle;
use crate::stats::{self, InstrumentRegistry, RollingWindow};

use super::types::{EmaSlope, EmaStats, MovingAverageMethod};

/// Minimum closes before an average is calculated
pub const MIN_PRICE_OBSERVATIONS: usize = 5;

/// EMA values retained per instrument for slope detection
pub const EMA_HISTORY_CAPACITY: usize = 5;

/// Extra closes kept beyond `ema_periods` so the EMA folds over more than its seed
const PRICE_BUFFER: usize = 5;

/// Configuration for the momentum analyzer
#[derive(Debug, Clone)]
pub struct MomentumAnalyzerConfig {
    /// EMA length (default: 21)
    pub ema_periods: usize,

    /// Optional bound on tracked instruments, least recently used evicted first
    pub max_instruments: Option<usize>,
}

impl Default for MomentumAnalyzerConfig {
    fn default() -> Self {
        Self {
            ema_periods: 21,
            max_instruments: None,
        }
    }
}

/// Shares the instrument bound with the volume detector
impl From<&Config> for MomentumAnalyzerConfig {
    fn from(config: &Config) -> Self {
        Self {
            ema_periods: config.momentum.ema_periods,
            max_instruments: config.volume.max_instruments,
        }
    }
}

/// Per-instrument price state
#[derive(Debug)]
struct PriceState {
    /// Closing prices, oldest first
    closes: RollingWindow<f64>,
    /// Values produced by previous calculations
    ema_history: RollingWindow<f64>,
}

impl PriceState {
    fn new(price_capacity: usize) -> Self {
        Self {
            closes: RollingWindow::new(price_capacity),
            ema_history: RollingWindow::new(EMA_HISTORY_CAPACITY),
        }
    }
}

/// EMA and slope analyzer over hourly closes
///
/// The price window is replaced on every [`MomentumAnalyzer::update`]; the
/// EMA history accumulates one value per [`MomentumAnalyzer::calculate_ema`]
/// call.
pub struct MomentumAnalyzer {
    config: MomentumAnalyzerConfig,
    state: InstrumentRegistry<PriceState>,
}

impl MomentumAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: MomentumAnalyzerConfig) -> Self {
        let state = match config.max_instruments {
            Some(max) => InstrumentRegistry::with_max_entries(max),
            None => InstrumentRegistry::new(),
        };
        Self { config, state }
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MomentumAnalyzerConfig::default())
    }

    pub fn ema_periods(&self) -> usize {
        self.config.ema_periods
    }

    /// Closes retained per instrument
    pub fn price_capacity(&self) -> usize {
        self.config.ema_periods + PRICE_BUFFER
    }

    /// Replace the instrument's closes with those of `candles`
    ///
    /// Candles may arrive in any order; they are sorted by timestamp first.
    /// An empty slice leaves existing state untouched.
    pub fn update(&mut self, instrument: &str, candles: &[Candle]) {
        if candles.is_empty() {
            return;
        }

        let mut sorted: Vec<&Candle> = candles.iter().collect();
        sorted.sort_by_key(|candle| candle.timestamp);

        let capacity = self.price_capacity();
        let state = self
            .state
            .get_or_create(instrument, || PriceState::new(capacity));

        state.closes.clear();
        for candle in sorted {
            state.closes.push(candle.close);
        }
    }

    /// Check if the instrument has enough closes for a calculation
    pub fn has_sufficient_data(&self, instrument: &str) -> bool {
        self.price_count(instrument) >= MIN_PRICE_OBSERVATIONS
    }

    /// Number of closes currently held for the instrument
    pub fn price_count(&self, instrument: &str) -> usize {
        self.state
            .get(instrument)
            .map_or(0, |state| state.closes.len())
    }

    /// Closes held for the instrument, oldest first
    pub fn prices(&self, instrument: &str) -> Vec<f64> {
        self.state
            .get(instrument)
            .map(|state| state.closes.to_vec())
            .unwrap_or_default()
    }

    /// EMA values from previous calculations, oldest first
    pub fn ema_history(&self, instrument: &str) -> Vec<f64> {
        self.state
            .get(instrument)
            .map(|state| state.ema_history.to_vec())
            .unwrap_or_default()
    }

    /// Number of instruments with state
    pub fn tracked_instruments(&self) -> usize {
        self.state.len()
    }

    /// Calculate the moving average and slope for the instrument
    ///
    /// Every successful call appends its value to the EMA history, so two
    /// calls without an intervening update still advance the slope window.
    pub fn calculate_ema(&mut self, instrument: &str) -> Option<EmaStats> {
        let ema_periods = self.config.ema_periods;
        let state = self.state.get_mut(instrument)?;

        if state.closes.len() < MIN_PRICE_OBSERVATIONS {
            return None;
        }

        let prices = state.closes.to_vec();
        let current_price = *prices.last()?;

        let (ema_value, method) = if prices.len() >= ema_periods {
            (stats::ema(&prices, ema_periods)?, MovingAverageMethod::Ema)
        } else {
            (stats::mean(&prices)?, MovingAverageMethod::Sma)
        };

        state.ema_history.push(ema_value);
        let slope = EmaSlope::classify(&state.ema_history.to_vec());

        tracing::trace!(
            instrument,
            current_price,
            ema_value,
            %method,
            %slope,
            "Calculated moving average"
        );

        Some(EmaStats {
            current_price,
            ema_value,
            price_above_ema: current_price > ema_value,
            slope,
            method,
            periods_used: prices.len(),
        })
    }

    /// One-line human readable summary of the instrument's momentum
    ///
    /// Runs a calculation, so it advances the EMA history like
    /// [`MomentumAnalyzer::calculate_ema`].
    pub fn analysis_summary(&mut self, instrument: &str) -> String {
        if !self.has_sufficient_data(instrument) {
            return "Insufficient data".to_string();
        }

        let Some(stats) = self.calculate_ema(instrument) else {
            return "Calculation failed".to_string();
        };

        let price_status = if stats.price_above_ema {
            "\u{2705} Above"
        } else {
            "\u{274c} Below"
        };
        let slope_status = if stats.slope.is_rising() {
            "\u{2705} Up"
        } else {
            "\u{2753} Unknown/Flat/Down"
        };

        format!(
            "Price {} {}-{} | Slope {} | Periods: {}",
            price_status, stats.method, self.config.ema_periods, slope_status, stats.periods_used
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candles(closes: &[f64]) -> Vec<Candle> {
        let base = Utc.timestamp_millis_opt(1_704_067_200_000).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| Candle::from_close(base + Duration::hours(i as i64), *close))
            .collect()
    }

    fn analyzer(ema_periods: usize) -> MomentumAnalyzer {
        MomentumAnalyzer::new(MomentumAnalyzerConfig {
            ema_periods,
            max_instruments: None,
        })
    }

    #[test]
    fn test_config_from_app_config() {
        let mut config = Config::default();
        config.momentum.ema_periods = 9;
        config.volume.max_instruments = Some(2);

        let mut analyzer = MomentumAnalyzer::new(MomentumAnalyzerConfig::from(&config));
        assert_eq!(analyzer.ema_periods(), 9);

        let closes = candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        for name in ["SOL", "DOGE", "WIF"] {
            analyzer.update(name, &closes);
        }
        assert_eq!(analyzer.tracked_instruments(), 2);
        assert_eq!(analyzer.price_count("SOL"), 0);
    }

    #[test]
    fn test_new_analyzer() {
        let analyzer = MomentumAnalyzer::with_defaults();
        assert_eq!(analyzer.ema_periods(), 21);
        assert_eq!(analyzer.price_capacity(), 26);
        assert_eq!(analyzer.tracked_instruments(), 0);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &[]);
        assert_eq!(analyzer.tracked_instruments(), 0);

        analyzer.update("SOL", &candles(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        analyzer.update("SOL", &[]);
        assert_eq!(analyzer.prices("SOL"), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_update_sorts_by_timestamp() {
        let mut analyzer = analyzer(3);
        let mut input = candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        input.reverse();
        input.swap(1, 3);

        analyzer.update("SOL", &input);
        assert_eq!(analyzer.prices("SOL"), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_update_replaces_window() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &candles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        analyzer.update("SOL", &candles(&[10.0, 20.0]));

        assert_eq!(analyzer.prices("SOL"), vec![10.0, 20.0]);
        assert!(!analyzer.has_sufficient_data("SOL"));
    }

    #[test]
    fn test_update_keeps_most_recent_at_capacity() {
        let mut analyzer = analyzer(3);
        // capacity = 3 + 5 = 8
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        analyzer.update("SOL", &candles(&closes));

        assert_eq!(
            analyzer.prices("SOL"),
            vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
        );
    }

    #[test]
    fn test_calculate_insufficient_data() {
        let mut analyzer = analyzer(3);
        assert!(analyzer.calculate_ema("SOL").is_none());

        analyzer.update("SOL", &candles(&[1.0, 2.0, 3.0, 4.0]));
        assert!(!analyzer.has_sufficient_data("SOL"));
        assert!(analyzer.calculate_ema("SOL").is_none());
        assert!(analyzer.ema_history("SOL").is_empty());
    }

    #[test]
    fn test_ema_uses_seed_then_fold() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));

        let stats = analyzer.calculate_ema("SOL").unwrap();
        // seed 20, fold 40 -> 30, fold 50 -> 40
        assert_eq!(stats.method, MovingAverageMethod::Ema);
        assert_eq!(stats.ema_value, 40.0);
        assert_eq!(stats.current_price, 50.0);
        assert!(stats.price_above_ema);
        assert_eq!(stats.periods_used, 5);
    }

    #[test]
    fn test_sma_fallback() {
        let mut analyzer = analyzer(21);
        analyzer.update("SOL", &candles(&[1.0, 2.0, 3.0, 4.0, 5.0, 9.0]));

        let stats = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(stats.method, MovingAverageMethod::Sma);
        assert_eq!(stats.ema_value, 4.0);
        assert_eq!(stats.periods_used, 6);
        assert!(stats.price_above_ema);
    }

    #[test]
    fn test_price_equal_to_ema_is_not_above() {
        let mut analyzer = analyzer(21);
        analyzer.update("SOL", &candles(&[5.0; 6]));

        let stats = analyzer.calculate_ema("SOL").unwrap();
        assert!(!stats.price_above_ema);
    }

    #[test]
    fn test_history_grows_once_per_call() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));

        for expected in 1..=5 {
            analyzer.calculate_ema("SOL").unwrap();
            assert_eq!(analyzer.ema_history("SOL").len(), expected);
        }

        analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(analyzer.ema_history("SOL").len(), EMA_HISTORY_CAPACITY);
    }

    #[test]
    fn test_update_keeps_ema_history() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));
        analyzer.calculate_ema("SOL").unwrap();

        analyzer.update("SOL", &candles(&[11.0, 21.0, 31.0, 41.0, 51.0]));
        assert_eq!(analyzer.ema_history("SOL"), vec![40.0]);
    }

    #[test]
    fn test_slope_unknown_then_rising() {
        let mut analyzer = analyzer(3);

        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));
        let first = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(first.slope, EmaSlope::Unknown);

        analyzer.update("SOL", &candles(&[20.0, 30.0, 40.0, 50.0, 60.0]));
        let second = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(second.slope, EmaSlope::Unknown);
        assert_eq!(second.ema_slope_up(), None);

        analyzer.update("SOL", &candles(&[30.0, 40.0, 50.0, 60.0, 70.0]));
        let third = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(analyzer.ema_history("SOL"), vec![40.0, 50.0, 60.0]);
        assert_eq!(third.slope, EmaSlope::Rising);
        assert_eq!(third.ema_slope_up(), Some(true));
    }

    #[test]
    fn test_repeated_calculation_is_flat() {
        let mut analyzer = analyzer(3);
        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));

        for _ in 0..3 {
            analyzer.calculate_ema("SOL").unwrap();
        }
        let stats = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(stats.slope, EmaSlope::NotRising);
        assert_eq!(stats.ema_slope_up(), None);
    }

    #[test]
    fn test_slope_falling() {
        let mut analyzer = analyzer(3);
        for closes in [
            [70.0, 60.0, 50.0, 40.0, 30.0],
            [60.0, 50.0, 40.0, 30.0, 20.0],
            [50.0, 40.0, 30.0, 20.0, 10.0],
        ] {
            analyzer.update("SOL", &candles(&closes));
            analyzer.calculate_ema("SOL").unwrap();
        }

        let history = analyzer.ema_history("SOL");
        assert!(history[0] > history[1] && history[1] > history[2]);

        analyzer.update("SOL", &candles(&[40.0, 30.0, 20.0, 10.0, 5.0]));
        let stats = analyzer.calculate_ema("SOL").unwrap();
        assert_eq!(stats.slope, EmaSlope::NotRising);
        assert!(!stats.price_above_ema);
    }

    #[test]
    fn test_analysis_summary() {
        let mut analyzer = analyzer(3);
        assert_eq!(analyzer.analysis_summary("SOL"), "Insufficient data");

        analyzer.update("SOL", &candles(&[10.0, 20.0, 30.0, 40.0, 50.0]));
        let summary = analyzer.analysis_summary("SOL");
        assert!(summary.contains("Above EMA-3"));
        assert!(summary.contains("Unknown/Flat/Down"));
        assert!(summary.ends_with("Periods: 5"));
        assert_eq!(analyzer.ema_history("SOL").len(), 1);
    }
}
