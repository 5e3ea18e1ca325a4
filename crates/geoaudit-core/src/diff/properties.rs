//! Record-level property comparison.

use crate::diff::model::FieldChange;
use crate::model::Properties;
use crate::normalize::normalize_properties;
use serde_json::Value;
use std::collections::BTreeSet;

/// Fields whose normalized values differ between `old` and `new`.
///
/// Both sides are normalized first (ignored fields dropped, floats rounded).
/// The union of remaining keys is walked in sorted order; a key missing on one
/// side compares as null, so an absent key and an explicit null are equal.
/// Numbers compare by value: `1` and `1.0` are the same property value.
pub fn diff_properties(
    old: &Properties,
    new: &Properties,
    ignore_fields: &BTreeSet<String>,
) -> Vec<FieldChange> {
    let old = normalize_properties(old, ignore_fields);
    let new = normalize_properties(new, ignore_fields);

    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    keys.into_iter()
        .filter_map(|key| {
            let before = old.get(key).unwrap_or(&Value::Null);
            let after = new.get(key).unwrap_or(&Value::Null);
            (!values_equal(before, after)).then(|| FieldChange {
                field: key.clone(),
                old: before.clone(),
                new: after.clone(),
            })
        })
        .collect()
}

/// JSON equality with numbers compared by value, recursively.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x == y
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}
