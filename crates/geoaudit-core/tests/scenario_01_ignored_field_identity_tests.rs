/// Scenario 1: ignored fields never take part in identity.
mod common;

use common::{audit_into, vehicle};
use geoaudit_core::policy::{LayerPolicy, SummarizerKind};
use geoaudit_core::summary::HumanSummary;
use serde_json::json;

#[test]
fn test_scenario_01_fid_change_is_not_a_fleet_change() {
    // GIVEN a fleet layer ignoring fid and data_referencia
    let policy = LayerPolicy::new(SummarizerKind::fleet())
        .with_ignore_fields(["fid", "data_referencia"]);

    // AND two snapshots where the only difference is the vehicle's fid
    let old = json!({"type": "FeatureCollection", "features": [vehicle(1, "Pioneira", "JKL-1234")]});
    let new = json!({"type": "FeatureCollection", "features": [vehicle(77, "Pioneira", "JKL-1234")]});

    // WHEN the layer is audited
    let mut summary = HumanSummary::new();
    let cmp = audit_into(&mut summary, "semob:Frota por Operadora", &policy, old, new);

    // THEN nothing was added or removed
    assert!(cmp.diff.added.is_empty());
    assert!(cmp.diff.removed.is_empty());
    assert!(summary.is_empty());
}

#[test]
fn test_scenario_01_same_fid_without_ignore_policy_is_a_change() {
    // GIVEN a fleet layer with no ignore policy
    let policy = LayerPolicy::new(SummarizerKind::fleet());

    let old = json!({"features": [vehicle(1, "Pioneira", "JKL-1234")]});
    let new = json!({"features": [vehicle(77, "Pioneira", "JKL-1234")]});

    // WHEN audited
    let mut summary = HumanSummary::new();
    let cmp = audit_into(&mut summary, "semob:Frota por Operadora", &policy, old, new);

    // THEN the record counts as replaced, with a zero net delta
    assert_eq!(cmp.diff.added.len(), 1);
    assert_eq!(cmp.diff.removed.len(), 1);
    assert_eq!(summary.fleet().get("Pioneira"), Some(&0));
    assert_eq!(summary.totals().fleet_churn, 0);
}

#[test]
fn test_scenario_01_feature_level_id_is_not_identity() {
    let policy = LayerPolicy::new(SummarizerKind::fleet()).with_ignore_fields(["fid"]);
    let mut a = vehicle(1, "Pioneira", "JKL-1234");
    let mut b = vehicle(1, "Pioneira", "JKL-1234");
    a["id"] = json!("frota.1");
    b["id"] = json!("frota.999");

    let mut summary = HumanSummary::new();
    let cmp = audit_into(
        &mut summary,
        "semob:Frota por Operadora",
        &policy,
        json!({"features": [a]}),
        json!({"features": [b]}),
    );
    assert!(cmp.diff.is_empty());
}
