use geoaudit_core::diff::{compare_collections, LayerComparison};
use geoaudit_core::policy::{LayerPolicy, SummaryLabels};
use geoaudit_core::summary::{summarize_layer, HumanSummary};
use geoaudit_core::FeatureCollection;
use serde_json::{json, Value};

/// Parse a collection from inline JSON
#[allow(dead_code)]
pub fn collection(v: Value) -> FeatureCollection {
    FeatureCollection::from_value(&v).unwrap()
}

/// A fleet vehicle record
#[allow(dead_code)]
pub fn vehicle(fid: i64, operator: &str, plate: &str) -> Value {
    json!({
        "type": "Feature",
        "id": format!("frota.{}", fid),
        "properties": {"fid": fid, "operadora": operator, "placa": plate, "data_referencia": "2025-01-10"},
        "geometry": null
    })
}

/// A scheduled trip record
#[allow(dead_code)]
pub fn trip(fid: i64, operator: &str, line: &str, departure: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": {"fid": fid, "nm_operadora": operator, "cd_linha": line, "hr_partida": departure},
        "geometry": null
    })
}

/// Compare two collections under `policy` and fold the result into `summary`
#[allow(dead_code)]
pub fn audit_into(
    summary: &mut HumanSummary,
    layer: &str,
    policy: &LayerPolicy,
    old: Value,
    new: Value,
) -> LayerComparison {
    let cmp = compare_collections(&collection(old), &collection(new), &policy.ignore_fields);
    summarize_layer(
        summary,
        layer,
        policy.effective_summarizer(),
        &cmp.diff,
        &cmp.old_index,
        &cmp.new_index,
        &SummaryLabels::default(),
    );
    cmp
}
