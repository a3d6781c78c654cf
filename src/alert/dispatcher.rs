//! Alert routing with console fallback

use super::{Alert, AlertError, AlertSink, ConsoleSink, TelegramSink};
use crate::config::AlertConfig;

/// Sends alerts to the primary sink, printing to the console if it fails
pub struct AlertDispatcher {
    sink: Box<dyn AlertSink>,
    fallback: ConsoleSink,
}

impl AlertDispatcher {
    /// Dispatcher over an arbitrary sink
    pub fn new(sink: Box<dyn AlertSink>) -> Self {
        Self {
            sink,
            fallback: ConsoleSink,
        }
    }

    /// Console-only dispatcher
    pub fn console() -> Self {
        Self::new(Box::new(ConsoleSink))
    }

    /// Telegram when both credentials are configured, console otherwise
    pub fn from_config(config: &AlertConfig) -> Result<Self, AlertError> {
        match (&config.bot_token, &config.chat_id) {
            (Some(token), Some(chat_id)) if config.telegram_configured() => {
                tracing::info!("Alerts will be sent to Telegram");
                Ok(Self::new(Box::new(TelegramSink::new(token, chat_id)?)))
            }
            _ => {
                tracing::warn!("BOT_TOKEN and CHAT_ID not set - alerts will be printed to console");
                Ok(Self::console())
            }
        }
    }

    /// Name of the primary sink
    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Deliver an alert; returns false when the primary sink failed
    pub async fn dispatch(&self, alert: &Alert) -> bool {
        match self.sink.send(alert).await {
            Ok(()) => {
                metrics::counter!("volspike_alerts_sent_total", "sink" => self.sink.name())
                    .increment(1);
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    sink = self.sink.name(),
                    token = %alert.asset.name,
                    "Alert delivery failed, falling back to console"
                );
                metrics::counter!("volspike_alert_failures_total").increment(1);
                self.fallback.print(&alert.format_message());
                false
            }
        }
    }
}
