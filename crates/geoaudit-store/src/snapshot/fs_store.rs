//! Filesystem snapshot store

use crate::errors::{corrupt_snapshot, encode_error, io_error, Result};
use crate::snapshot::atomic::atomic_write;
use crate::snapshot::naming::layer_file_name;
use geoaudit_core::{ExError, FeatureCollection};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of persisting one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSnapshot {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the written bytes, hex encoded
    pub digest: String,
}

/// Stores the latest collection of every layer under one directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `layer`'s snapshot lives.
    pub fn path_for(&self, layer: &str) -> PathBuf {
        self.root.join(layer_file_name(layer))
    }

    pub fn exists(&self, layer: &str) -> bool {
        self.path_for(layer).is_file()
    }

    /// Load the stored JSON document for `layer`.
    ///
    /// `Ok(None)` means no baseline exists yet.
    ///
    /// # Errors
    ///
    /// `ERR_IO` when the file cannot be read, `ERR_PERSISTENCE` when it is
    /// not valid JSON.
    pub fn load_raw(&self, layer: &str) -> Result<Option<Value>> {
        let path = self.path_for(layer);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("load_snapshot", e).with_layer(layer)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| corrupt_snapshot(layer, e))?;
        Ok(Some(value))
    }

    /// Load and interpret the stored collection for `layer`.
    ///
    /// # Errors
    ///
    /// As [`FsSnapshotStore::load_raw`], plus `ERR_INVALID_COLLECTION` when
    /// the document is not a feature collection.
    pub fn load(&self, layer: &str) -> Result<Option<FeatureCollection>> {
        let Some(value) = self.load_raw(layer)? else {
            return Ok(None);
        };
        FeatureCollection::from_value(&value).map(Some).map_err(|e| {
            ExError::from(e)
                .with_op("load_snapshot")
                .with_layer(layer)
        })
    }

    /// Replace the stored snapshot of `layer` with `document`.
    ///
    /// # Errors
    ///
    /// `ERR_SERIALIZATION` when encoding fails, `ERR_IO` when writing fails.
    pub fn save(&self, layer: &str, document: &Value) -> Result<SavedSnapshot> {
        let bytes = serde_json::to_vec(document).map_err(|e| encode_error(layer, e))?;
        let path = self.path_for(layer);
        atomic_write(&path, &bytes).map_err(|e| e.with_layer(layer))?;

        let digest = hex::encode(Sha256::digest(&bytes));
        tracing::debug!(
            layer,
            path = %path.display(),
            bytes = bytes.len(),
            digest = %digest,
            "snapshot saved"
        );

        Ok(SavedSnapshot {
            path,
            bytes: bytes.len(),
            digest,
        })
    }
}
