//! Per-layer summarizers.
//!
//! Fold one layer's added/removed fingerprints into the run summary. Every
//! occurrence behind a fingerprint counts, so duplicated records are all
//! accounted for. A summarizer only writes its own category and never reads
//! state produced by another layer.

use crate::diff::LayerDiff;
use crate::model::Feature;
use crate::policy::{SummarizerKind, SummaryLabels};
use crate::snapshot::{Fingerprint, SnapshotIndex};
use crate::summary::model::HumanSummary;
use std::collections::BTreeSet;

/// Fold `diff` for `layer` into `summary` following `kind`.
///
/// Added fingerprints are resolved against `new_index`, removed ones against
/// `old_index`.
pub fn summarize_layer(
    summary: &mut HumanSummary,
    layer: &str,
    kind: &SummarizerKind,
    diff: &LayerDiff,
    old_index: &SnapshotIndex,
    new_index: &SnapshotIndex,
    labels: &SummaryLabels,
) {
    let added = occurrences(&diff.added, new_index);
    let removed = occurrences(&diff.removed, old_index);

    match kind {
        SummarizerKind::Fleet { operator_field } => {
            for f in added {
                summary.record_fleet(&operator_of(f, operator_field, labels), 1);
            }
            for f in removed {
                summary.record_fleet(&operator_of(f, operator_field, labels), -1);
            }
        }
        SummarizerKind::Schedule {
            operator_field,
            line_field,
        } => {
            for f in added {
                let (op, line) = operator_line(f, operator_field, line_field, labels);
                summary.record_schedule_added(&op, &line);
            }
            for f in removed {
                let (op, line) = operator_line(f, operator_field, line_field, labels);
                summary.record_schedule_removed(&op, &line);
            }
        }
        SummarizerKind::Spatial {
            operator_field,
            line_field,
        } => {
            for f in added.chain(removed) {
                let (op, line) = operator_line(f, operator_field, line_field, labels);
                summary.record_spatial(&op, &line);
            }
        }
        SummarizerKind::Generic => {
            let added = added.count() as u64;
            let removed = removed.count() as u64;
            if added + removed > 0 {
                summary.record_generic(layer, added, removed);
            }
        }
    }

    tracing::debug!(
        layer,
        summarizer = kind.name(),
        added = diff.added.len(),
        removed = diff.removed.len(),
        "layer summarized"
    );
}

fn occurrences<'a>(
    fingerprints: &'a BTreeSet<Fingerprint>,
    index: &'a SnapshotIndex,
) -> impl Iterator<Item = &'a Feature> + 'a {
    fingerprints
        .iter()
        .filter_map(move |fp| index.get(fp))
        .flatten()
}

fn operator_of(feature: &Feature, field: &str, labels: &SummaryLabels) -> String {
    feature
        .label(field)
        .unwrap_or_else(|| labels.unknown_operator.clone())
}

fn operator_line(
    feature: &Feature,
    operator_field: &str,
    line_field: &str,
    labels: &SummaryLabels,
) -> (String, String) {
    (
        operator_of(feature, operator_field, labels),
        feature
            .label(line_field)
            .unwrap_or_else(|| labels.unknown_line.clone()),
    )
}
