#![allow(clippy::unwrap_used, clippy::expect_used)]

use geoaudit_core::errors::{ExError, ExErrorKind};
use geoaudit_core::summary::{Notification, Severity, NO_CHANGES_BODY};
use geoaudit_engine::{run_audit, AuditConfig, FeatureSource, LayerStatus, Notifier};
use geoaudit_store::FsSnapshotStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

const CONFIG: &str = r#"
base_url = "https://geoserver.example/geoserver/semob/ows"
title = "GeoServer Audit SEMOB-DF"

[[layers]]
name = "semob:Frota por Operadora"
ignore_fields = ["data_referencia", "fid"]
summarizer = { kind = "fleet" }

[[layers]]
name = "semob:Horários das Linhas"
ignore_fields = ["fid"]
summarizer = { kind = "schedule" }

[[layers]]
name = "semob:linha_metro"

[[layers]]
name = "semob:Última posição da frota"
skip = true
"#;

/// In-memory source whose documents can be swapped between runs
#[derive(Default)]
struct FakeSource {
    documents: Mutex<HashMap<String, Value>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    fn set(&self, layer: &str, doc: Value) {
        self.documents.lock().unwrap().insert(layer.to_string(), doc);
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl FeatureSource for FakeSource {
    fn fetch(&self, layer: &str) -> geoaudit_store::Result<Value> {
        self.fetched.lock().unwrap().push(layer.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(layer)
            .cloned()
            .ok_or_else(|| {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("fetch_layer")
                    .with_layer(layer)
                    .with_message("HTTP 503")
            })
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn channel(&self) -> &'static str {
        "recording"
    }

    fn deliver(&self, notification: &Notification, _executed_at: &str) -> geoaudit_store::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn channel(&self) -> &'static str {
        "failing"
    }

    fn deliver(&self, _: &Notification, _: &str) -> geoaudit_store::Result<()> {
        Err(ExError::new(ExErrorKind::Timeout).with_message("webhook timed out"))
    }
}

fn fleet(vehicles: &[(i64, &str, &str)]) -> Value {
    let features: Vec<Value> = vehicles
        .iter()
        .map(|(fid, op, plate)| {
            json!({"type": "Feature", "properties": {"fid": fid, "operadora": op, "placa": plate, "data_referencia": "2026-10-18"}, "geometry": null})
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

fn setup() -> (AuditConfig, FsSnapshotStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = AuditConfig::parse(CONFIG).unwrap();
    let store = FsSnapshotStore::new(dir.path());
    (config, store, dir)
}

fn seed_all(source: &FakeSource) {
    source.set("semob:Frota por Operadora", fleet(&[(1, "Pioneira", "AAA-1111")]));
    source.set("semob:Horários das Linhas", json!({"features": []}));
    source.set("semob:linha_metro", json!({"features": [{"properties": {"cor": "verde"}}]}));
}

#[test]
fn test_first_run_creates_baselines_and_reports_nothing() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);
    let notifier = RecordingNotifier::default();

    let outcome = run_audit(&config, &source, &store, &notifier).unwrap();

    let statuses: Vec<&LayerStatus> = outcome.layers.iter().map(|r| &r.status).collect();
    assert_eq!(
        statuses,
        vec![
            &LayerStatus::BaselineCreated,
            &LayerStatus::BaselineCreated,
            &LayerStatus::BaselineCreated,
            &LayerStatus::Skipped,
        ]
    );
    assert!(store.exists("semob:Frota por Operadora"));
    assert!(!store.exists("semob:Última posição da frota"));

    assert_eq!(outcome.notification.severity, Severity::Normal);
    assert_eq!(outcome.notification.body, NO_CHANGES_BODY);
    assert!(outcome.delivered);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[test]
fn test_skipped_layer_is_never_fetched() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);

    run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();

    assert_eq!(
        source.fetched(),
        vec![
            "semob:Frota por Operadora".to_string(),
            "semob:Horários das Linhas".to_string(),
            "semob:linha_metro".to_string(),
        ]
    );
}

#[test]
fn test_second_run_reports_changes_and_rotates_baseline() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);
    run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();

    // Pioneira loses its vehicle, Marechal gains two; fid churn alone is ignored
    source.set(
        "semob:Frota por Operadora",
        fleet(&[(5, "Marechal", "BBB-2222"), (6, "Marechal", "CCC-3333")]),
    );
    source.set("semob:linha_metro", json!({"features": [{"properties": {"cor": "azul"}}]}));

    let notifier = RecordingNotifier::default();
    let outcome = run_audit(&config, &source, &store, &notifier).unwrap();

    assert_eq!(
        outcome.layers[0].status,
        LayerStatus::Compared { added: 2, removed: 1 }
    );
    assert_eq!(
        outcome.layers[2].status,
        LayerStatus::Compared { added: 1, removed: 1 }
    );
    assert_eq!(outcome.summary.fleet().get("Marechal"), Some(&2));
    assert_eq!(outcome.summary.fleet().get("Pioneira"), Some(&-1));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent[0].severity, Severity::Attention);
    assert_eq!(sent[0].title, "🟡 GeoServer Audit SEMOB-DF - ATTENTION");
    assert!(sent[0].body.contains("• Marechal: +2 vehicles"));
    assert!(sent[0].body.contains("semob:linha_metro: +1 added | -1 removed"));

    // Third run with identical data: the baseline moved forward
    let outcome = run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();
    assert_eq!(outcome.notification.severity, Severity::Normal);
}

#[test]
fn test_failed_layer_does_not_stop_the_run() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);
    run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();

    // Schedule layer disappears from the service; metro changes
    source.documents.lock().unwrap().remove("semob:Horários das Linhas");
    source.set("semob:linha_metro", json!({"features": []}));

    let outcome = run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();

    match &outcome.layers[1].status {
        LayerStatus::Failed { error } => {
            assert!(error.contains("ERR_EXTERNAL_SERVICE"));
            assert!(error.contains("HTTP 503"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(
        outcome.layers[2].status,
        LayerStatus::Compared { added: 0, removed: 1 }
    );
    assert_eq!(outcome.failed_layers().count(), 1);
    assert_eq!(outcome.notification.severity, Severity::Attention);
}

#[test]
fn test_malformed_payload_fails_layer_and_keeps_baseline() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);
    run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();
    let before = store.load_raw("semob:linha_metro").unwrap();

    source.set("semob:linha_metro", json!({"features": "not-a-list"}));
    let outcome = run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();

    assert!(matches!(outcome.layers[2].status, LayerStatus::Failed { .. }));
    assert_eq!(store.load_raw("semob:linha_metro").unwrap(), before);
}

#[test]
fn test_notification_failure_is_not_fatal() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);

    let outcome = run_audit(&config, &source, &store, &FailingNotifier).unwrap();
    assert!(!outcome.delivered);
}

#[test]
fn test_outcome_serializes_layer_statuses() {
    let (config, store, _dir) = setup();
    let source = FakeSource::default();
    seed_all(&source);

    let outcome = run_audit(&config, &source, &store, &RecordingNotifier::default()).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["layers"][0]["layer"], "semob:Frota por Operadora");
    assert_eq!(json["layers"][0]["status"], "baseline_created");
    assert_eq!(json["layers"][3]["status"], "skipped");
    assert_eq!(json["notification"]["severity"], "NORMAL");
}

#[test]
fn test_compare_layer_offline() {
    let config = AuditConfig::parse(CONFIG).unwrap();
    let trips = |rows: &[(i64, &str)]| {
        let features: Vec<Value> = rows
            .iter()
            .map(|(fid, line)| json!({"properties": {"fid": fid, "nm_operadora": "ACME", "cd_linha": line}}))
            .collect();
        geoaudit_core::FeatureCollection::from_value(&json!({"features": features})).unwrap()
    };

    let report = geoaudit_engine::compare_layer(
        &config,
        "semob:Horários das Linhas",
        &trips(&[(1, "100")]),
        &trips(&[(2, "200")]),
    )
    .unwrap();

    assert_eq!((report.added, report.removed), (1, 1));
    assert_eq!(report.summary.schedule_counts("ACME", "100").removed, 1);
    assert_eq!(report.summary.schedule_counts("ACME", "200").added, 1);
    assert_eq!(report.notification.severity, Severity::Attention);
}

#[test]
fn test_compare_layer_rejects_unknown_layer() {
    let config = AuditConfig::parse(CONFIG).unwrap();
    let empty = geoaudit_core::FeatureCollection::default();
    let err = geoaudit_engine::compare_layer(&config, "semob:nope", &empty, &empty).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
