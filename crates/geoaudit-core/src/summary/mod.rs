//! Run summary, severity classification and report rendering.
//!
//! A [`HumanSummary`] is created fresh for every run, mutated by
//! [`summarize_layer`] once per compared layer, and read once at the end to
//! classify severity and render the report body.

pub mod human_summary;
pub mod model;
pub mod notification;
pub mod severity;
pub mod summarizer;

pub use human_summary::render_report;
pub use model::{HumanSummary, LineCounts, SummaryTotals};
pub use notification::{build_notification, Notification, NO_CHANGES_BODY};
pub use severity::{classify, Severity, SeverityThresholds};
pub use summarizer::summarize_layer;
