//! Side-by-side audit of one matched record pair.

use crate::diff::geometry::geometry_diff;
use crate::diff::model::{FeatureAudit, GeometryChange, DISTANCE_DECIMALS};
use crate::diff::properties::diff_properties;
use crate::model::Feature;
use serde_json::Value;
use std::collections::BTreeSet;

/// Compare one old/new feature pair already known to be the same record.
pub fn audit_feature(old: &Feature, new: &Feature, ignore_fields: &BTreeSet<String>) -> FeatureAudit {
    FeatureAudit {
        property_changes: diff_properties(&old.properties, &new.properties, ignore_fields),
        geometry_change: geometry_diff(old.geometry.as_ref(), new.geometry.as_ref()),
    }
}

/// Render an audit as indented report lines. Unchanged records render nothing.
pub fn format_feature_audit(record_id: &str, audit: &FeatureAudit) -> Vec<String> {
    let mut lines = Vec::new();

    if !audit.property_changes.is_empty() {
        lines.push(format!("Record {}", record_id));
        for change in &audit.property_changes {
            lines.push(format!(
                "  {}: {} → {}",
                change.field,
                display_value(&change.old),
                display_value(&change.new)
            ));
        }
    }

    if let Some(geometry) = &audit.geometry_change {
        lines.push(format!("Record {} (GEOMETRY CHANGED)", record_id));
        match geometry {
            GeometryChange::Measured { .. } => {
                if let Some(d) = geometry.hausdorff_distance() {
                    lines.push(format!("  max displacement ≈ {}", format_distance(d)));
                }
            }
            GeometryChange::AddedOrRemoved => {
                if let Some(reason) = geometry.reason() {
                    lines.push(format!("  reason: {}", reason));
                }
            }
            GeometryChange::Unmeasured { error } => {
                lines.push(format!("  error: {}", error));
            }
        }
    }

    lines
}

/// Distance rounded to three decimals; nonzero values that round to zero
/// render as `< 0.001`.
pub fn format_distance(distance: f64) -> String {
    let scale = 10f64.powi(DISTANCE_DECIMALS);
    let rounded = (distance * scale).round() / scale;
    if rounded == 0.0 && distance > 0.0 {
        "< 0.001".to_string()
    } else {
        format!("{}", rounded)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
