//! Volume anomaly detection module
//!
//! Keeps a rolling window of 24h notional volume observations per instrument
//! and scores the latest observation against that window in standard
//! deviations.

mod detector;
mod types;

pub use detector::{VolumeAnomalyDetector, VolumeDetectorConfig, MIN_VOLUME_OBSERVATIONS};
pub use types::VolumeStats;
