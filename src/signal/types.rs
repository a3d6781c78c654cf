//! Signal types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Momentum condition that held when a spike was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MomentumCondition {
    /// Latest close above the moving average
    PriceAboveEma,
    /// Moving average strictly rising over its last three values
    EmaRising,
}

impl fmt::Display for MomentumCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentumCondition::PriceAboveEma => write!(f, "Price > EMA"),
            MomentumCondition::EmaRising => write!(f, "EMA Rising"),
        }
    }
}

/// Why an asset produced no alert this cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Fewer than five volume observations
    InsufficientVolumeHistory,
    /// Baseline volume has zero variance
    DegenerateVolume,
    /// Volume scores below threshold (carries the sigma deviation)
    NoVolumeSpike(f64),
    /// Candle request returned nothing usable
    NoCandles,
    /// Fewer than five closes
    InsufficientPriceHistory,
    /// Close not above the moving average
    PriceBelowEma,
    /// Moving average computed but not rising
    EmaNotRising,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InsufficientVolumeHistory => write!(f, "Insufficient volume history"),
            RejectReason::DegenerateVolume => write!(f, "Volume baseline has zero variance"),
            RejectReason::NoVolumeSpike(sigma) => write!(f, "No volume spike ({:.2} sigma)", sigma),
            RejectReason::NoCandles => write!(f, "No candle data"),
            RejectReason::InsufficientPriceHistory => write!(f, "Insufficient price history"),
            RejectReason::PriceBelowEma => write!(f, "Price not above EMA"),
            RejectReason::EmaNotRising => write!(f, "EMA not rising"),
        }
    }
}
