//! Severity classification.

use crate::summary::model::SummaryTotals;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report urgency. Ordered `Normal < Attention < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Normal,
    Attention,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::Attention => "ATTENTION",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Normal => "🟢",
            Severity::Attention => "🟡",
            Severity::Critical => "🔴",
        }
    }

    /// Adaptive Card text color for this level.
    pub fn card_color(&self) -> &'static str {
        match self {
            Severity::Normal => "good",
            Severity::Attention => "warning",
            Severity::Critical => "attention",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive lower bounds that make a run critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub schedule_churn: u64,
    pub fleet_churn: u64,
    pub spatial_changes: u64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            schedule_churn: 50,
            fleet_churn: 20,
            spatial_changes: 10,
        }
    }
}

/// Classify a run from its totals. First matching rule wins:
/// critical on any threshold reached, attention on any nonzero total,
/// normal otherwise.
pub fn classify(totals: &SummaryTotals, thresholds: &SeverityThresholds) -> Severity {
    if totals.schedule_churn >= thresholds.schedule_churn
        || totals.fleet_churn >= thresholds.fleet_churn
        || totals.spatial_changes >= thresholds.spatial_changes
    {
        Severity::Critical
    } else if !totals.is_zero() {
        Severity::Attention
    } else {
        Severity::Normal
    }
}
