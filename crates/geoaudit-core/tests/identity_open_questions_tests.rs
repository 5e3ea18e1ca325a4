//! Known, deliberate limits of fingerprint identity.
//!
//! - Hashing sees raw floats while property comparison rounds them, so float
//!   jitter changes identity without producing a field change.
//! - The set differ ignores how many times a fingerprint occurs.

use geoaudit_core::diff::{audit_feature, compare_collections, diff_properties};
use geoaudit_core::snapshot::fingerprint;
use geoaudit_core::{Feature, FeatureCollection};
use serde_json::json;
use std::collections::BTreeSet;

fn stop(lat: f64) -> serde_json::Value {
    json!({"properties": {"nome": "Parada 114", "lat": lat}, "geometry": null})
}

#[test]
fn test_float_jitter_changes_identity_but_not_properties() {
    let old = Feature::from_value(&stop(-15.794287101)).unwrap();
    let new = Feature::from_value(&stop(-15.794287102)).unwrap();

    // Fingerprints differ: hashing keeps the raw float
    assert_ne!(fingerprint(&old), fingerprint(&new));

    // Property comparison rounds to six places and sees nothing
    assert!(diff_properties(&old.properties, &new.properties, &BTreeSet::new()).is_empty());
    assert!(audit_feature(&old, &new, &BTreeSet::new()).is_unchanged());

    // Collection level reports the record as replaced
    let old_fc = FeatureCollection::from_value(&json!({"features": [stop(-15.794287101)]})).unwrap();
    let new_fc = FeatureCollection::from_value(&json!({"features": [stop(-15.794287102)]})).unwrap();
    let cmp = compare_collections(&old_fc, &new_fc, &BTreeSet::new());
    assert_eq!(cmp.diff.added.len(), 1);
    assert_eq!(cmp.diff.removed.len(), 1);
}

#[test]
fn test_multiplicity_change_is_not_reported() {
    let s = stop(-15.79);
    let old = FeatureCollection::from_value(&json!({"features": [s, s, s]})).unwrap();
    let new = FeatureCollection::from_value(&json!({"features": [s, s, s, s, s]})).unwrap();

    let cmp = compare_collections(&old, &new, &BTreeSet::new());
    assert!(cmp.diff.is_empty());

    // Counts are still available to callers
    let fp = cmp.old_index.fingerprints().next().cloned().unwrap();
    assert_eq!(cmp.old_index.occurrences(&fp), 3);
    assert_eq!(cmp.new_index.occurrences(&fp), 5);
    assert_eq!(cmp.new_index.feature_count(), 5);
}
