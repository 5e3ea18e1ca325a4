//! geoaudit core - change detection over geographic feature snapshots
//!
//! This crate is the pure, I/O-free heart of the audit:
//! - Normalization and canonicalization of features for stable comparison
//! - Content fingerprints (SHA-256 over canonical JSON)
//! - Snapshot indices and set-based added/removed diffing per layer
//! - Field-level property diffing and geometry diffing (Hausdorff distance)
//! - Per-layer summarizers folding diffs into a per-run human summary
//! - Severity classification and report rendering
//!
//! Fetching, persistence and notification delivery live in the store and
//! engine crates.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod snapshot;
pub mod summary;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, GeoAuditError, Result};
pub use model::{Feature, FeatureCollection};
pub use policy::{LayerCatalog, LayerPolicy, SummarizerKind};
pub use snapshot::{Fingerprint, SnapshotIndex};
pub use summary::{HumanSummary, Severity};
