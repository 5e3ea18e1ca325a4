//! Audit run orchestration.
//!
//! ## Pipeline (per run)
//! 1. Validate the layer catalog (hard stop, nothing fetched)
//! 2. For every layer, in configured order, strictly sequentially:
//!    skip, or fetch → load baseline → compare → persist → summarize
//! 3. Classify severity and render the report from the run's summary
//! 4. Deliver the notification (failure is logged, never fatal)
//!
//! A failing layer is logged and recorded as [`LayerStatus::Failed`]; it
//! contributes nothing to the summary and the loop continues.

#![allow(clippy::result_large_err)]

use crate::config::AuditConfig;
use crate::notify::Notifier;
use crate::source::FeatureSource;
use geoaudit_core::diff::compare_collections;
use geoaudit_core::errors::{ExError, ExErrorKind};
use geoaudit_core::policy::{LayerPolicy, SummaryLabels};
use geoaudit_core::summary::{build_notification, summarize_layer, HumanSummary, Notification};
use geoaudit_core::{log_op_end, log_op_error, log_op_start, FeatureCollection};
use geoaudit_core_types::schema::{EVENT_BASELINE_CREATED, EVENT_SKIPPED};
use geoaudit_core_types::RunId;
use geoaudit_store::{FsSnapshotStore, Result};
use serde::Serialize;
use std::time::Instant;

/// Execution timestamp format shown in notifications
pub const EXECUTED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// What happened to one layer during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayerStatus {
    /// Configured with `skip`; not fetched, not persisted
    Skipped,
    /// No previous snapshot; the fetched collection became the baseline
    BaselineCreated,
    /// Compared against the baseline; counts are distinct fingerprints
    Compared { added: usize, removed: usize },
    /// Fetch, load, parse or persist failed; the run continued
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerReport {
    pub layer: String,
    #[serde(flatten)]
    pub status: LayerStatus,
}

/// Result of one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub run_id: String,
    pub executed_at: String,
    pub layers: Vec<LayerReport>,
    pub summary: HumanSummary,
    pub notification: Notification,
    pub delivered: bool,
}

impl AuditOutcome {
    pub fn failed_layers(&self) -> impl Iterator<Item = &LayerReport> {
        self.layers
            .iter()
            .filter(|r| matches!(r.status, LayerStatus::Failed { .. }))
    }
}

/// Run one audit over every configured layer.
///
/// # Errors
///
/// Only configuration problems (`ERR_INVALID_CONFIG`) abort a run, and they
/// are detected before any layer is touched.
pub fn run_audit(
    config: &AuditConfig,
    source: &dyn FeatureSource,
    store: &FsSnapshotStore,
    notifier: &dyn Notifier,
) -> Result<AuditOutcome> {
    let catalog = config.catalog()?;
    let run_id = RunId::new();
    let executed_at = chrono::Local::now().format(EXECUTED_AT_FORMAT).to_string();
    let start = Instant::now();

    log_op_start!("audit_run", run_id = run_id.as_str(), layers = catalog.len());

    let mut summary = HumanSummary::new();
    let mut layers = Vec::with_capacity(catalog.len());

    for (layer, policy) in catalog.iter() {
        let status = if policy.skip {
            tracing::info!(
                component = module_path!(),
                op = "audit_layer",
                event = EVENT_SKIPPED,
                layer,
                "layer skipped"
            );
            LayerStatus::Skipped
        } else {
            process_layer(layer, policy, source, store, &mut summary, &config.labels, &run_id)
        };
        layers.push(LayerReport {
            layer: layer.to_string(),
            status,
        });
    }

    let notification = build_notification(&summary, &config.severity, &config.title);

    let delivered = match notifier.deliver(&notification, &executed_at) {
        Ok(()) => true,
        Err(e) => {
            log_op_error!(
                "deliver_notification",
                e.with_run_id(run_id.clone()),
                duration_ms = start.elapsed().as_millis() as u64,
                channel = notifier.channel()
            );
            false
        }
    };

    log_op_end!(
        "audit_run",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str(),
        severity = notification.severity.as_str(),
        delivered = delivered
    );

    Ok(AuditOutcome {
        run_id: run_id.as_str().to_string(),
        executed_at,
        layers,
        summary,
        notification,
        delivered,
    })
}

/// Process one layer, converting any failure into [`LayerStatus::Failed`].
fn process_layer(
    layer: &str,
    policy: &LayerPolicy,
    source: &dyn FeatureSource,
    store: &FsSnapshotStore,
    summary: &mut HumanSummary,
    labels: &SummaryLabels,
    run_id: &RunId,
) -> LayerStatus {
    let start = Instant::now();
    log_op_start!("audit_layer", layer = layer);

    match audit_layer(layer, policy, source, store, summary, labels) {
        Ok(status) => {
            if let LayerStatus::Compared { added, removed } = &status {
                log_op_end!(
                    "audit_layer",
                    duration_ms = start.elapsed().as_millis() as u64,
                    layer = layer,
                    added = *added as u64,
                    removed = *removed as u64
                );
            } else {
                log_op_end!(
                    "audit_layer",
                    duration_ms = start.elapsed().as_millis() as u64,
                    layer = layer
                );
            }
            status
        }
        Err(e) => {
            let e = with_layer_context(e, layer).with_run_id(run_id.clone());
            let error = e.to_string();
            log_op_error!(
                "audit_layer",
                e,
                duration_ms = start.elapsed().as_millis() as u64,
                layer = layer
            );
            LayerStatus::Failed { error }
        }
    }
}

fn with_layer_context(e: ExError, layer: &str) -> ExError {
    if e.layer().is_some() {
        e
    } else {
        e.with_layer(layer)
    }
}

fn audit_layer(
    layer: &str,
    policy: &LayerPolicy,
    source: &dyn FeatureSource,
    store: &FsSnapshotStore,
    summary: &mut HumanSummary,
    labels: &SummaryLabels,
) -> Result<LayerStatus> {
    let document = source.fetch(layer)?;
    let new_fc = FeatureCollection::from_value(&document)
        .map_err(|e| ExError::from(e).with_op("parse_layer"))?;

    let Some(old_fc) = store.load(layer)? else {
        store.save(layer, &document)?;
        tracing::info!(
            component = module_path!(),
            op = "audit_layer",
            event = EVENT_BASELINE_CREATED,
            layer,
            features = new_fc.len() as u64,
            "baseline created"
        );
        return Ok(LayerStatus::BaselineCreated);
    };

    let cmp = compare_collections(&old_fc, &new_fc, &policy.ignore_fields);

    // Persist before summarizing so a failed write leaves the summary untouched
    store.save(layer, &document)?;

    summarize_layer(
        summary,
        layer,
        policy.effective_summarizer(),
        &cmp.diff,
        &cmp.old_index,
        &cmp.new_index,
        labels,
    );

    Ok(LayerStatus::Compared {
        added: cmp.diff.added.len(),
        removed: cmp.diff.removed.len(),
    })
}

/// Offline comparison of two saved collections of one configured layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerDiffReport {
    pub layer: String,
    pub added: usize,
    pub removed: usize,
    pub summary: HumanSummary,
    pub notification: Notification,
}

/// Compare `old` and `new` under the policy configured for `layer`, as a
/// one-layer run without fetching, persisting or delivering anything.
///
/// # Errors
///
/// `ERR_INVALID_CONFIG` for an invalid catalog, `ERR_INVALID_INPUT` when
/// `layer` is not configured.
pub fn compare_layer(
    config: &AuditConfig,
    layer: &str,
    old: &FeatureCollection,
    new: &FeatureCollection,
) -> Result<LayerDiffReport> {
    let catalog = config.catalog()?;
    let policy = catalog.get(layer).ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("compare_layer")
            .with_layer(layer)
            .with_message("layer is not configured")
    })?;

    let cmp = compare_collections(old, new, &policy.ignore_fields);
    let mut summary = HumanSummary::new();
    summarize_layer(
        &mut summary,
        layer,
        policy.effective_summarizer(),
        &cmp.diff,
        &cmp.old_index,
        &cmp.new_index,
        &config.labels,
    );
    let notification = build_notification(&summary, &config.severity, &config.title);

    Ok(LayerDiffReport {
        layer: layer.to_string(),
        added: cmp.diff.added.len(),
        removed: cmp.diff.removed.len(),
        summary,
        notification,
    })
}
