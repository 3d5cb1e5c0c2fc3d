use anyhow::Result;
use log::info;

use crate::storage::traits::PushNotifier;

/// Default push channel: writes the notification to the log instead of
/// calling a delivery service. The hosted deployment swaps in a real
/// gateway behind the same trait.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl PushNotifier for LogNotifier {
    fn send_push(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<()> {
        info!(
            "🔔 PUSH ({} token{}): {} - {} {}",
            tokens.len(),
            if tokens.len() == 1 { "" } else { "s" },
            title,
            body,
            data
        );
        Ok(())
    }
}
