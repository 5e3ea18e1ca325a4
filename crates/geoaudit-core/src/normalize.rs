//! Normalization for stable comparison.
//!
//! Two canonical forms exist and they differ on purpose:
//!
//! - [`canonicalize_feature`] (identity/hashing): ignored fields removed,
//!   values untouched.
//! - [`normalize_properties`] (property comparison): ignored fields removed
//!   and floats rounded to [`FLOAT_PRECISION`] decimal digits.
//!
//! Float jitter in the source therefore changes a feature's fingerprint while
//! property-level diffing of the same pair reports nothing.

use crate::model::{Feature, Properties};
use serde_json::{Number, Value};
use std::collections::BTreeSet;

/// Decimal digits kept when comparing float properties.
pub const FLOAT_PRECISION: i32 = 6;

/// Normalize a single property value.
///
/// Floats are rounded to [`FLOAT_PRECISION`] decimal places; integers,
/// strings, booleans, null and nested values pass through unchanged.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64().and_then(round_float) {
            Some(rounded) => Value::Number(rounded),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

fn round_float(v: f64) -> Option<Number> {
    let scale = 10f64.powi(FLOAT_PRECISION);
    let scaled = v * scale;
    if !scaled.is_finite() {
        return Number::from_f64(v);
    }
    Number::from_f64(scaled.round() / scale)
}

/// Properties without `ignore_fields`, every value normalized.
///
/// Keys holding null are kept.
pub fn normalize_properties(props: &Properties, ignore_fields: &BTreeSet<String>) -> Properties {
    props
        .iter()
        .filter(|(k, _)| !ignore_fields.contains(k.as_str()))
        .map(|(k, v)| (k.clone(), normalize_value(v)))
        .collect()
}

/// Canonical form used for fingerprinting.
///
/// Removes `ignore_fields` from the properties and carries the geometry
/// unchanged. Idempotent.
pub fn canonicalize_feature(feature: &Feature, ignore_fields: &BTreeSet<String>) -> Feature {
    let properties = feature
        .properties
        .iter()
        .filter(|(k, _)| !ignore_fields.contains(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Feature {
        properties,
        geometry: feature.geometry.clone(),
    }
}
