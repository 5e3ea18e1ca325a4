//! Fingerprint index over one feature collection.

use crate::model::{Feature, FeatureCollection};
use crate::normalize::canonicalize_feature;
use crate::snapshot::digest::{fingerprint, Fingerprint};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical features of one collection grouped by fingerprint.
///
/// Identical canonical features collapse into one key but every occurrence is
/// retained, in first-seen order, so summarizers still see each real record.
/// Built fresh per comparison; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotIndex {
    buckets: BTreeMap<Fingerprint, Vec<Feature>>,
    feature_count: usize,
}

impl SnapshotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already canonicalized feature.
    pub fn insert(&mut self, canonical: Feature) -> Fingerprint {
        let fp = fingerprint(&canonical);
        self.buckets.entry(fp.clone()).or_default().push(canonical);
        self.feature_count += 1;
        fp
    }

    /// Every occurrence sharing `fp`, in first-seen order.
    pub fn get(&self, fp: &Fingerprint) -> Option<&[Feature]> {
        self.buckets.get(fp).map(Vec::as_slice)
    }

    pub fn contains(&self, fp: &Fingerprint) -> bool {
        self.buckets.contains_key(fp)
    }

    /// Number of occurrences of `fp` (0 when absent).
    pub fn occurrences(&self, fp: &Fingerprint) -> usize {
        self.buckets.get(fp).map_or(0, Vec::len)
    }

    /// Distinct fingerprints, sorted.
    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.buckets.keys()
    }

    pub fn fingerprint_set(&self) -> BTreeSet<&Fingerprint> {
        self.buckets.keys().collect()
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of features indexed, duplicates included.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }
}

/// Index every feature of `collection` by the fingerprint of its canonical form.
pub fn build_index(
    collection: &FeatureCollection,
    ignore_fields: &BTreeSet<String>,
) -> SnapshotIndex {
    let mut index = SnapshotIndex::new();
    for feature in &collection.features {
        index.insert(canonicalize_feature(feature, ignore_fields));
    }
    index
}
