//! geoaudit engine - orchestration layer
//!
//! Coordinates one audit run: loads configuration, fetches every configured
//! layer, compares it with the stored baseline through the core, persists the
//! new baseline and hands the composed notification to a delivery channel.

pub mod config;
pub mod notify;
pub mod run;
pub mod source;

pub use config::{AuditConfig, HttpConfig, LayerConfig};
pub use notify::{adaptive_card, Notifier, StdoutNotifier, TeamsNotifier};
pub use run::{compare_layer, run_audit, AuditOutcome, LayerDiffReport, LayerReport, LayerStatus};
pub use source::{FeatureSource, WfsSource};
