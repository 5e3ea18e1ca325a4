//! Per-layer snapshot files
//!
//! Provides:
//! - Layer identifier to file name mapping
//! - Atomic writes so a crash never leaves a half-written baseline
//! - The filesystem store used by the audit run

mod atomic;
mod fs_store;
mod naming;

pub use fs_store::{FsSnapshotStore, SavedSnapshot};
pub use naming::layer_file_name;
