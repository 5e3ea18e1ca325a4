//! Deterministic fingerprinting of canonical features.
//!
//! The canonical encoding is compact JSON with object keys sorted by byte
//! order at every nesting level, independent of how the underlying map type
//! orders its keys. Numbers use serde_json's shortest round-trip formatting,
//! which is platform independent.

use crate::model::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest identifying a canonical feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for logs and reports.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint of an already canonicalized feature.
///
/// ```
/// use geoaudit_core::model::Feature;
/// use geoaudit_core::snapshot::fingerprint;
///
/// let fp = fingerprint(&Feature::default());
/// assert_eq!(fp.as_str().len(), 64);
/// ```
pub fn fingerprint(canonical: &Feature) -> Fingerprint {
    let mut doc = serde_json::Map::new();
    doc.insert(
        "geometry".to_string(),
        canonical.geometry.clone().unwrap_or(Value::Null),
    );
    doc.insert(
        "properties".to_string(),
        Value::Object(canonical.properties.clone()),
    );
    Fingerprint(hash_string(&canonical_json(&Value::Object(doc))))
}

/// Encode a JSON value with sorted object keys and no insignificant whitespace.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
