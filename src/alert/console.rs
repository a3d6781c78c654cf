//! Console alert sink

use super::{Alert, AlertError, AlertSink};
use async_trait::async_trait;

/// Prints alerts to stdout followed by a separator rule
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn render(message: &str) -> String {
        format!("\n{}\n{}", message, "=".repeat(50))
    }

    pub fn print(&self, message: &str) {
        println!("{}", Self::render(message));
    }
}

#[async_trait]
impl AlertSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        self.print(&alert.format_message());
        Ok(())
    }
}
