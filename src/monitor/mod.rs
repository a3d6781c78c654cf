//! Monitoring loop module
//!
//! Each cycle fetches every perpetual's 24h volume, scores it against its
//! rolling baseline and, only for spikes, fetches hourly candles to confirm
//! momentum before alerting.

mod selection;
mod shutdown;
mod spike_monitor;
mod strict_list;
mod types;

pub use selection::AssetFilter;
pub use shutdown::{shutdown_channel, wait_for_signal, Shutdown};
pub use spike_monitor::SpikeMonitor;
pub use strict_list::{StrictList, STRICT_MIN_MARGIN_TABLE_ID, STRICT_MIN_MAX_LEVERAGE};
pub use types::{CycleSummary, Evaluation};
