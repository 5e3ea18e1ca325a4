/// File extension of stored snapshots
pub const SNAPSHOT_EXTENSION: &str = "geojson";

/// File name for a layer's snapshot.
///
/// The workspace separator `:` becomes `__`; path separators become `_` so a
/// layer name can never point outside the snapshot directory.
///
/// The mapping is not injective (`a/b` and `a_b` share a file); callers
/// configuring several layers must reject such collisions.
pub fn layer_file_name(layer: &str) -> String {
    let stem: String = layer
        .replace(':', "__")
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", stem, SNAPSHOT_EXTENSION)
}
