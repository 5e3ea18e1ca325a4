//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;

/// Atomically replace `target_path` with `content`
///
/// # Errors
///
/// `ERR_IO` when the directory, temp file or rename fails.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_snapshot_dir", e))?;
    }

    // Same directory as the target, so the rename never crosses filesystems
    let temp_path = target_path.with_extension("geojson.tmp");

    fs::write(&temp_path, content).map_err(|e| io_error("write_snapshot_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_snapshot_temp", e))?;

    Ok(())
}
