//! Collection-level set differ.
//!
//! `added = keys(new) - keys(old)`, `removed = keys(old) - keys(new)`.
//! A fingerprint present on both sides appears in neither set, even when its
//! number of occurrences changed: three identical stops becoming five
//! identical stops is not reported. [`SnapshotIndex::occurrences`] exposes the
//! counts for callers that need them.
//!
//! [`SnapshotIndex::occurrences`]: crate::snapshot::SnapshotIndex::occurrences

use crate::diff::model::LayerDiff;
use crate::model::FeatureCollection;
use crate::snapshot::{build_index, SnapshotIndex};
use std::collections::BTreeSet;

/// Compute added/removed fingerprints between two indices of one layer.
pub fn diff_indices(old_index: &SnapshotIndex, new_index: &SnapshotIndex) -> LayerDiff {
    let added = new_index
        .fingerprints()
        .filter(|fp| !old_index.contains(fp))
        .cloned()
        .collect();
    let removed = old_index
        .fingerprints()
        .filter(|fp| !new_index.contains(fp))
        .cloned()
        .collect();
    LayerDiff { added, removed }
}

/// Both indices of a comparison plus their diff.
///
/// Summarizers need the indices to recover the features behind each
/// fingerprint.
#[derive(Debug, Clone)]
pub struct LayerComparison {
    pub old_index: SnapshotIndex,
    pub new_index: SnapshotIndex,
    pub diff: LayerDiff,
}

/// Index both collections with the same ignore policy and diff them.
pub fn compare_collections(
    old: &FeatureCollection,
    new: &FeatureCollection,
    ignore_fields: &BTreeSet<String>,
) -> LayerComparison {
    let old_index = build_index(old, ignore_fields);
    let new_index = build_index(new, ignore_fields);
    let diff = diff_indices(&old_index, &new_index);
    LayerComparison {
        old_index,
        new_index,
        diff,
    }
}
