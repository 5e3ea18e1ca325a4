//! Features and feature collections.
//!
//! Parsing is permissive in the way the audit needs: a feature without
//! `properties` gets an empty mapping, a feature without `geometry` has no
//! shape, and a collection without `features` is empty. Anything else carried
//! by a GeoJSON feature (`type`, `id`, `bbox`) is dropped, so feature-level
//! ids assigned by the server never take part in identity.

use crate::errors::{GeoAuditError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Property mapping of a feature (string keys to JSON scalars).
pub type Properties = Map<String, Value>;

/// One geographic record: attributes plus an optional shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl Feature {
    pub fn new(properties: Properties, geometry: Option<Value>) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    /// Interpret an arbitrary JSON value as a feature.
    ///
    /// # Errors
    ///
    /// `InvalidFeatureCollection` when the value is not an object or its
    /// `properties` member is neither an object nor null.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(GeoAuditError::InvalidFeatureCollection {
                reason: format!("feature must be a JSON object, got {}", kind_of(value)),
            });
        }
        Feature::deserialize(value).map_err(|e| GeoAuditError::InvalidFeatureCollection {
            reason: format!("malformed feature: {}", e),
        })
    }

    /// String form of a property, used as a grouping label by summarizers.
    ///
    /// Missing and null properties yield `None`; numbers and booleans are
    /// rendered with their JSON text.
    pub fn label(&self, field: &str) -> Option<String> {
        match self.properties.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// An ordered sequence of features for one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Interpret a fetched or persisted JSON document as a collection.
    ///
    /// A missing or null `features` member is an empty collection.
    ///
    /// # Errors
    ///
    /// `InvalidFeatureCollection` when the root is not an object, when
    /// `features` is not an array, or when any entry is not a feature.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| GeoAuditError::InvalidFeatureCollection {
                reason: format!(
                    "collection root must be a JSON object, got {}",
                    kind_of(value)
                ),
            })?;

        let features = match obj.get("features") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(Feature::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(GeoAuditError::InvalidFeatureCollection {
                    reason: format!("`features` must be an array, got {}", kind_of(other)),
                })
            }
        };

        Ok(Self { features })
    }

    /// Parse a collection from raw JSON text.
    ///
    /// # Errors
    ///
    /// `Serialization` for invalid JSON, otherwise as [`Self::from_value`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
