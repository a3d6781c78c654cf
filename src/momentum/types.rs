//! Momentum analysis types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moving average used for the momentum reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovingAverageMethod {
    /// Exponential moving average over `ema_periods`
    Ema,
    /// Simple mean fallback when history is shorter than `ema_periods`
    Sma,
}

impl MovingAverageMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovingAverageMethod::Ema => "EMA",
            MovingAverageMethod::Sma => "SMA",
        }
    }
}

impl fmt::Display for MovingAverageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the EMA over its last three calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSlope {
    /// Last three values strictly increasing
    Rising,
    /// Three values available but not strictly increasing (flat, falling or mixed)
    NotRising,
    /// Fewer than three values calculated so far
    Unknown,
}

impl EmaSlope {
    /// Classify from an EMA history ordered oldest to newest
    pub fn classify(history: &[f64]) -> Self {
        match history {
            [.., a, b, c] if a < b && b < c => EmaSlope::Rising,
            [.., _, _, _] => EmaSlope::NotRising,
            _ => EmaSlope::Unknown,
        }
    }

    pub fn is_rising(&self) -> bool {
        *self == EmaSlope::Rising
    }

    /// Nullable view: `Some(true)` when rising, `None` otherwise.
    ///
    /// `Some(false)` is never produced; a `None` must not be read as falling.
    pub fn as_option(&self) -> Option<bool> {
        self.is_rising().then_some(true)
    }
}

impl fmt::Display for EmaSlope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmaSlope::Rising => write!(f, "rising"),
            EmaSlope::NotRising => write!(f, "not rising"),
            EmaSlope::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of one EMA calculation for an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaStats {
    /// Most recent close
    pub current_price: f64,

    /// EMA or SMA value, see `method`
    pub ema_value: f64,

    /// `current_price > ema_value`
    pub price_above_ema: bool,

    /// Slope of the EMA history including this calculation
    pub slope: EmaSlope,

    /// Which average produced `ema_value`
    pub method: MovingAverageMethod,

    /// Number of closes the average was computed from
    pub periods_used: usize,
}

impl EmaStats {
    /// Nullable slope flag, see [`EmaSlope::as_option`]
    pub fn ema_slope_up(&self) -> Option<bool> {
        self.slope.as_option()
    }
}
