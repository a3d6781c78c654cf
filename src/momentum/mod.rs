//! Momentum analysis module
//!
//! Confirms a volume spike with price momentum: the latest close relative to
//! an EMA of recent hourly closes, and whether that EMA has been rising over
//! its last three calculations.

mod analyzer;
mod types;

pub use analyzer::{
    MomentumAnalyzer, MomentumAnalyzerConfig, EMA_HISTORY_CAPACITY, MIN_PRICE_OBSERVATIONS,
};
pub use types::{EmaSlope, EmaStats, MovingAverageMethod};
