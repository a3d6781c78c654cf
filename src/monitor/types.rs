//! Monitor result types

use crate::alert::Alert;
use crate::signal::RejectReason;
use std::time::Duration;

/// Outcome of evaluating one asset
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// Volume spike confirmed by momentum
    Alert(Box<Alert>),
    /// No alert this cycle
    Skipped(RejectReason),
}

impl Evaluation {
    pub fn is_alert(&self) -> bool {
        matches!(self, Evaluation::Alert(_))
    }
}

/// Totals for one monitoring cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    /// Assets returned by the API
    pub assets_fetched: usize,
    /// Assets left after filtering
    pub assets_analyzed: usize,
    /// Assets whose volume qualified as a spike
    pub volume_spikes: usize,
    /// Alerts raised (delivered or printed by fallback)
    pub alerts_sent: usize,
    /// Assets whose evaluation failed
    pub errors: usize,
    pub elapsed: Duration,
}
