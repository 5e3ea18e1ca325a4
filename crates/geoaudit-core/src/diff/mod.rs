//! Change detection.
//!
//! Two independent levels of comparison:
//!
//! - **Collection level** ([`engine`]): set difference of fingerprints between
//!   two snapshot indices of one layer. Answers "which exact records appeared
//!   or disappeared"; it never pairs an old record with its new version.
//! - **Record level** ([`properties`], [`geometry`], [`audit`]): for an old/new
//!   pair already known to be the same record, which fields changed and how
//!   far the shape moved.
//!
//! ## Entry points
//!
//! ```ignore
//! use geoaudit_core::diff::{compare_collections, audit_feature};
//!
//! let comparison = compare_collections(&old_fc, &new_fc, &policy.ignore_fields);
//! let audit = audit_feature(&old_feature, &new_feature, &policy.ignore_fields);
//! ```

pub mod audit;
pub mod engine;
pub mod geometry;
pub mod model;
pub mod properties;

pub use audit::{audit_feature, format_feature_audit};
pub use engine::{compare_collections, diff_indices, LayerComparison};
pub use geometry::{geometry_diff, parse_geometry, GeometryParseError};
pub use model::{FeatureAudit, FieldChange, GeometryChange, LayerDiff};
pub use properties::diff_properties;
