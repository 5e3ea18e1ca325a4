//! geoaudit store - snapshot persistence
//!
//! Provides:
//! - One UTF-8 GeoJSON file per layer, named from the layer identifier
//! - Atomic replacement of the previous baseline (temp file, then rename)
//! - Loading of the previous baseline, with "no baseline yet" as `None`

pub mod errors;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::{layer_file_name, FsSnapshotStore, SavedSnapshot};
