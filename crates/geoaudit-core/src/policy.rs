//! Per-layer audit policy.
//!
//! A [`LayerPolicy`] says which properties are excluded before hashing and
//! comparison, and which summarizer folds the layer's diff into the run
//! summary. Summarizer behaviour is selected by configuration through the
//! closed [`SummarizerKind`] set, never by matching on layer names.

use crate::errors::{GeoAuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// How a layer's added/removed features are folded into the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarizerKind {
    /// Vehicle fleet per operator: signed net delta per operator.
    Fleet {
        #[serde(default = "default_fleet_operator_field")]
        operator_field: String,
    },
    /// Scheduled trips: independent add/remove counts per (operator, line).
    Schedule {
        #[serde(default = "default_operator_field")]
        operator_field: String,
        #[serde(default = "default_line_field")]
        line_field: String,
    },
    /// Route geometry: unsigned change count per (operator, line).
    Spatial {
        #[serde(default = "default_operator_field")]
        operator_field: String,
        #[serde(default = "default_line_field")]
        line_field: String,
    },
    /// Anything else: added/removed counts keyed by layer name.
    #[default]
    Generic,
}

impl SummarizerKind {
    pub fn fleet() -> Self {
        SummarizerKind::Fleet {
            operator_field: default_fleet_operator_field(),
        }
    }

    pub fn schedule() -> Self {
        SummarizerKind::Schedule {
            operator_field: default_operator_field(),
            line_field: default_line_field(),
        }
    }

    pub fn spatial() -> Self {
        SummarizerKind::Spatial {
            operator_field: default_operator_field(),
            line_field: default_line_field(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SummarizerKind::Fleet { .. } => "fleet",
            SummarizerKind::Schedule { .. } => "schedule",
            SummarizerKind::Spatial { .. } => "spatial",
            SummarizerKind::Generic => "generic",
        }
    }
}

fn default_fleet_operator_field() -> String {
    "operadora".to_string()
}

fn default_operator_field() -> String {
    "nm_operadora".to_string()
}

fn default_line_field() -> String {
    "cd_linha".to_string()
}

fn default_tracked() -> bool {
    true
}

/// Audit policy for one logical layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPolicy {
    /// Properties removed before hashing and property comparison.
    #[serde(default)]
    pub ignore_fields: BTreeSet<String>,
    /// Untracked layers always fall back to the generic summarizer.
    #[serde(default = "default_tracked")]
    pub tracked: bool,
    /// Skipped layers are neither fetched, compared nor persisted.
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub summarizer: SummarizerKind,
}

impl Default for LayerPolicy {
    fn default() -> Self {
        Self {
            ignore_fields: BTreeSet::new(),
            tracked: true,
            skip: false,
            summarizer: SummarizerKind::Generic,
        }
    }
}

impl LayerPolicy {
    pub fn new(summarizer: SummarizerKind) -> Self {
        Self {
            summarizer,
            ..Self::default()
        }
    }

    pub fn with_ignore_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn untracked(mut self) -> Self {
        self.tracked = false;
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// The summarizer actually applied to this layer.
    pub fn effective_summarizer(&self) -> &SummarizerKind {
        if self.tracked {
            &self.summarizer
        } else {
            &SummarizerKind::Generic
        }
    }
}

/// Fallback labels used when a grouping property is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLabels {
    #[serde(default = "default_unknown_operator")]
    pub unknown_operator: String,
    #[serde(default = "default_unknown_line")]
    pub unknown_line: String,
}

fn default_unknown_operator() -> String {
    "DESCONHECIDA".to_string()
}

fn default_unknown_line() -> String {
    "??".to_string()
}

impl Default for SummaryLabels {
    fn default() -> Self {
        Self {
            unknown_operator: default_unknown_operator(),
            unknown_line: default_unknown_line(),
        }
    }
}

/// The ordered set of layers audited in one run.
///
/// Construction validates the run precondition: at least one layer, and
/// layer names that are non-empty and unique. Iteration follows the
/// configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCatalog {
    layers: Vec<(String, LayerPolicy)>,
}

impl LayerCatalog {
    /// # Errors
    ///
    /// `EmptyLayerCatalog`, `EmptyLayerName` or `DuplicateLayer`.
    pub fn new<I, S>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, LayerPolicy)>,
        S: Into<String>,
    {
        let layers: Vec<(String, LayerPolicy)> =
            layers.into_iter().map(|(n, p)| (n.into(), p)).collect();

        if layers.is_empty() {
            return Err(GeoAuditError::EmptyLayerCatalog);
        }

        let mut seen = HashSet::new();
        for (name, _) in &layers {
            if name.trim().is_empty() {
                return Err(GeoAuditError::EmptyLayerName);
            }
            if !seen.insert(name.as_str()) {
                return Err(GeoAuditError::DuplicateLayer {
                    layer: name.clone(),
                });
            }
        }

        Ok(Self { layers })
    }

    pub fn get(&self, layer: &str) -> Option<&LayerPolicy> {
        self.layers
            .iter()
            .find(|(name, _)| name == layer)
            .map(|(_, policy)| policy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayerPolicy)> {
        self.layers.iter().map(|(name, policy)| (name.as_str(), policy))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
