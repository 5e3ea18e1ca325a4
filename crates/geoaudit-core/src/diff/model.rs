//! Diff output types.
//!
//! Collections use `BTreeSet` / sorted `Vec` for deterministic serialization.

use crate::snapshot::Fingerprint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Reason reported when exactly one side of a pair has a geometry.
pub const GEOMETRY_ADDED_OR_REMOVED: &str = "geometry_added_or_removed";

/// Decimal places used when presenting a Hausdorff distance.
pub const DISTANCE_DECIMALS: i32 = 3;

/// Added/removed fingerprints of one layer in one comparison.
///
/// `added` and `removed` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDiff {
    /// Fingerprints present in the new snapshot only
    pub added: BTreeSet<Fingerprint>,
    /// Fingerprints present in the old snapshot only
    pub removed: BTreeSet<Fingerprint>,
}

impl LayerDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Added plus removed fingerprints.
    pub fn churn(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// One property whose normalized value differs between old and new.
///
/// A key missing on one side is reported as null on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

/// A detected geometry change. "No change" is represented by `None` at the
/// call site, so every variant here means the shape did change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryChange {
    /// Exactly one side has a geometry.
    AddedOrRemoved,
    /// Both sides parsed and differ; `hausdorff_distance` is exact.
    Measured {
        hausdorff_distance: f64,
        geom_type_old: String,
        geom_type_new: String,
    },
    /// Both sides present but at least one could not be compared.
    Unmeasured { error: String },
}

impl GeometryChange {
    pub fn changed(&self) -> bool {
        true
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            GeometryChange::AddedOrRemoved => Some(GEOMETRY_ADDED_OR_REMOVED),
            _ => None,
        }
    }

    pub fn hausdorff_distance(&self) -> Option<f64> {
        match self {
            GeometryChange::Measured {
                hausdorff_distance, ..
            } => Some(*hausdorff_distance),
            _ => None,
        }
    }

    /// Hausdorff distance rounded to [`DISTANCE_DECIMALS`] places.
    pub fn rounded_distance(&self) -> Option<f64> {
        let scale = 10f64.powi(DISTANCE_DECIMALS);
        self.hausdorff_distance()
            .map(|d| (d * scale).round() / scale)
    }

    pub fn geom_type_old(&self) -> Option<&str> {
        match self {
            GeometryChange::Measured { geom_type_old, .. } => Some(geom_type_old),
            _ => None,
        }
    }

    pub fn geom_type_new(&self) -> Option<&str> {
        match self {
            GeometryChange::Measured { geom_type_new, .. } => Some(geom_type_new),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GeometryChange::Unmeasured { error } => Some(error),
            _ => None,
        }
    }
}

/// Record-level comparison of one matched old/new feature pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureAudit {
    pub property_changes: Vec<FieldChange>,
    pub geometry_change: Option<GeometryChange>,
}

impl FeatureAudit {
    pub fn is_unchanged(&self) -> bool {
        self.property_changes.is_empty() && self.geometry_change.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_distance_three_places() {
        let change = GeometryChange::Measured {
            hausdorff_distance: 12.34567,
            geom_type_old: "LineString".to_string(),
            geom_type_new: "LineString".to_string(),
        };
        assert_eq!(change.rounded_distance(), Some(12.346));
        assert_eq!(change.hausdorff_distance(), Some(12.34567));
        assert_eq!(change.reason(), None);
    }

    #[test]
    fn test_added_or_removed_has_reason_and_no_distance() {
        let change = GeometryChange::AddedOrRemoved;
        assert!(change.changed());
        assert_eq!(change.reason(), Some(GEOMETRY_ADDED_OR_REMOVED));
        assert_eq!(change.hausdorff_distance(), None);
        assert_eq!(change.error(), None);
    }

    #[test]
    fn test_geometry_change_serializes_tagged() {
        let json = serde_json::to_value(GeometryChange::Unmeasured {
            error: "bad ring".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unmeasured", "error": "bad ring"}));
    }

    #[test]
    fn test_layer_diff_churn() {
        let diff = LayerDiff::default();
        assert!(diff.is_empty());
        assert_eq!(diff.churn(), 0);
    }
}
