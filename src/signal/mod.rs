//! Signal confirmation module
//!
//! Decides whether volume statistics count as a spike and whether the
//! momentum reading confirms it.

mod filter;
mod types;

pub use filter::{FilterResult, SpikeFilter, SpikeFilterConfig};
pub use types::{MomentumCondition, RejectReason};
