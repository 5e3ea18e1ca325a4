//! Notification collaborator: delivers a composed report.
//!
//! Transports own the wire format only; they never change severity or body.

use geoaudit_core::errors::{ExError, ExErrorKind};
use geoaudit_core::summary::Notification;
use geoaudit_core_types::Sensitive;
use geoaudit_store::Result;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

/// Delivers a notification somewhere a human will read it.
pub trait Notifier: Send + Sync {
    /// Short channel name for logs
    fn channel(&self) -> &'static str;

    /// Deliver `notification`, stamped with the run's execution time.
    ///
    /// # Errors
    ///
    /// Transport failures. Callers log them; they never abort a run.
    #[allow(clippy::result_large_err)]
    fn deliver(&self, notification: &Notification, executed_at: &str) -> Result<()>;
}

/// Adaptive Card 1.4 message for a Teams incoming webhook.
pub fn adaptive_card(notification: &Notification, executed_at: &str) -> Value {
    json!({
        "type": "message",
        "attachments": [{
            "contentType": "application/vnd.microsoft.card.adaptive",
            "content": {
                "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                "type": "AdaptiveCard",
                "version": "1.4",
                "body": [
                    {
                        "type": "TextBlock",
                        "text": notification.title,
                        "weight": "Bolder",
                        "size": "Large",
                        "color": notification.severity.card_color()
                    },
                    {
                        "type": "TextBlock",
                        "text": format!("Executed: {}", executed_at),
                        "isSubtle": true
                    },
                    {
                        "type": "TextBlock",
                        "text": notification.body,
                        "wrap": true
                    }
                ]
            }
        }]
    })
}

/// Posts Adaptive Cards to a Teams incoming webhook.
pub struct TeamsNotifier {
    client: reqwest::blocking::Client,
    webhook_url: Sensitive<String>,
}

impl TeamsNotifier {
    /// # Errors
    ///
    /// `ERR_INTERNAL` when the HTTP client cannot be built.
    pub fn new(webhook_url: Sensitive<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("build_http_client")
                    .with_message(format!("http client: {}", e))
            })?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

impl Notifier for TeamsNotifier {
    fn channel(&self) -> &'static str {
        "teams"
    }

    fn deliver(&self, notification: &Notification, executed_at: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.webhook_url.expose())
            .json(&adaptive_card(notification, executed_at))
            .send()
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    ExErrorKind::Timeout
                } else {
                    ExErrorKind::ExternalService
                };
                // reqwest errors embed the URL, which carries the webhook token
                ExError::new(kind)
                    .with_op("deliver_notification")
                    .with_message(format!("webhook request failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        tracing::info!(
            channel = self.channel(),
            status = status.as_u16(),
            severity = notification.severity.as_str(),
            "notification posted"
        );

        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("deliver_notification")
                .with_message(format!("webhook answered HTTP {}", status)));
        }
        Ok(())
    }
}

/// Prints the notification to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl StdoutNotifier {
    /// Plain-text rendering used by [`Notifier::deliver`].
    pub fn render(notification: &Notification, executed_at: &str) -> String {
        format!(
            "{}\nExecuted: {}\n\n{}\n",
            notification.title, executed_at, notification.body
        )
    }
}

impl Notifier for StdoutNotifier {
    fn channel(&self) -> &'static str {
        "stdout"
    }

    fn deliver(&self, notification: &Notification, executed_at: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(Self::render(notification, executed_at).as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| geoaudit_store::errors::io_error("deliver_notification", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoaudit_core::summary::{Severity, NO_CHANGES_BODY};

    fn critical() -> Notification {
        Notification::compose(
            "GeoServer Audit",
            Severity::Critical,
            Some("🚌 Fleet by Operator\n\n• Pioneira: +25 vehicles".to_string()),
        )
    }

    #[test]
    fn test_adaptive_card_shape() {
        let card = adaptive_card(&critical(), "18/10/2026 07:00");
        let content = &card["attachments"][0]["content"];

        assert_eq!(card["type"], "message");
        assert_eq!(content["version"], "1.4");
        assert_eq!(content["body"][0]["text"], "🔴 GeoServer Audit - CRITICAL");
        assert_eq!(content["body"][0]["color"], "attention");
        assert_eq!(content["body"][1]["text"], "Executed: 18/10/2026 07:00");
        assert_eq!(content["body"][1]["isSubtle"], true);
        assert_eq!(content["body"][2]["wrap"], true);
        assert!(content["body"][2]["text"]
            .as_str()
            .unwrap()
            .contains("Pioneira"));
    }

    #[test]
    fn test_card_color_follows_severity() {
        let normal = Notification::compose("Audit", Severity::Normal, None);
        let card = adaptive_card(&normal, "now");
        assert_eq!(card["attachments"][0]["content"]["body"][0]["color"], "good");
        assert_eq!(
            card["attachments"][0]["content"]["body"][2]["text"],
            NO_CHANGES_BODY
        );
    }

    #[test]
    fn test_stdout_rendering() {
        let text = StdoutNotifier::render(&critical(), "18/10/2026 07:00");
        assert!(text.starts_with("🔴 GeoServer Audit - CRITICAL\nExecuted: 18/10/2026 07:00\n\n"));
    }

    #[test]
    fn test_unreachable_webhook_is_an_error_without_the_url() {
        let notifier = TeamsNotifier::new(
            Sensitive::new("http://127.0.0.1:9/webhook/secret-token".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = notifier.deliver(&critical(), "now").unwrap_err();
        assert!(!err.to_string().contains("secret-token"));
    }
}
