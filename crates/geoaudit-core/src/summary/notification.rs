//! Notification composition.

use crate::summary::human_summary::render_report;
use crate::summary::model::HumanSummary;
use crate::summary::severity::{classify, Severity, SeverityThresholds};
use serde::{Deserialize, Serialize};

/// Body sent when nothing changed in any monitored layer.
pub const NO_CHANGES_BODY: &str =
    "No changes detected in the monitored layers.\nSystem operating normally.";

/// What the notification collaborator delivers. Transports must not alter
/// severity or body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Compose from a severity and an optional rendered report.
    ///
    /// The title reads `<emoji> <title> - <LEVEL>`; a missing report becomes
    /// [`NO_CHANGES_BODY`].
    pub fn compose(title: &str, severity: Severity, report: Option<String>) -> Self {
        Self {
            severity,
            title: format!("{} {} - {}", severity.emoji(), title, severity.as_str()),
            body: report.unwrap_or_else(|| NO_CHANGES_BODY.to_string()),
        }
    }
}

/// Classify, render and compose in one step.
pub fn build_notification(
    summary: &HumanSummary,
    thresholds: &SeverityThresholds,
    title: &str,
) -> Notification {
    let severity = classify(&summary.totals(), thresholds);
    Notification::compose(title, severity, render_report(summary))
}
