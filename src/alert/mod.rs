//! Alert module
//!
//! Builds the alert payload for a confirmed spike and delivers it to
//! Telegram, falling back to the console.

mod console;
mod dispatcher;
mod telegram;
mod types;

pub use console::ConsoleSink;
pub use dispatcher::AlertDispatcher;
pub use telegram::{TelegramSink, TELEGRAM_API_URL};
pub use types::Alert;

use async_trait::async_trait;
use thiserror::Error;

/// Alert delivery errors
#[derive(Debug, Error)]
pub enum AlertError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status code
    #[error("Telegram API error: {status} - {body}")]
    Status { status: u16, body: String },
}

/// Destination for formatted alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Deliver one alert
    async fn send(&self, alert: &Alert) -> Result<(), AlertError>;
}
