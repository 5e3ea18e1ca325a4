//! Content fingerprints and snapshot indices.
//!
//! ## Identity
//!
//! A feature's identity is the SHA-256 digest of the canonical JSON encoding
//! of its canonical form (ignored fields removed). Two features with the same
//! canonical form always share a fingerprint, across runs and machines.
//! Changing the normalization rules changes every fingerprint; snapshots are
//! stored raw and re-indexed on each run, so no migration is needed.

pub mod digest;
pub mod index;

pub use digest::{canonical_json, fingerprint, Fingerprint};
pub use index::{build_index, SnapshotIndex};
