// Integration tests for the filesystem snapshot store

use geoaudit_store::FsSnapshotStore;
use serde_json::json;
use tempfile::TempDir;

fn setup_store() -> (FsSnapshotStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp snapshot directory");
    (FsSnapshotStore::new(dir.path().join("geoserver_snapshots")), dir)
}

#[test]
fn test_first_save_creates_directory_and_baseline() {
    // Given: A store whose directory does not exist yet
    let (store, _dir) = setup_store();
    assert!(!store.root().exists());

    // When: A layer is saved
    let doc = json!({"type": "FeatureCollection", "features": []});
    store.save("semob:terminais_onibus", &doc).unwrap();

    // Then: The directory and the baseline exist
    assert!(store.root().is_dir());
    assert!(store.exists("semob:terminais_onibus"));
}

#[test]
fn test_save_replaces_previous_baseline() {
    let (store, _dir) = setup_store();
    let first = json!({"features": [{"properties": {"nome": "Terminal Asa Sul"}}]});
    let second = json!({"features": []});

    let a = store.save("semob:terminais_onibus", &first).unwrap();
    let b = store.save("semob:terminais_onibus", &second).unwrap();

    assert_eq!(a.path, b.path);
    assert_ne!(a.digest, b.digest);
    assert_eq!(store.load_raw("semob:terminais_onibus").unwrap(), Some(second));
}

#[test]
fn test_layers_are_stored_independently() {
    let (store, _dir) = setup_store();
    store
        .save("semob:linha_metro", &json!({"features": [{"properties": {"cor": "verde"}}]}))
        .unwrap();

    assert!(store.exists("semob:linha_metro"));
    assert!(!store.exists("semob:estacoes_metro"));
    assert_eq!(store.load("semob:estacoes_metro").unwrap(), None);
}

#[test]
fn test_stored_document_that_is_not_a_collection_is_rejected() {
    let (store, _dir) = setup_store();
    store.save("semob:linha_metro", &json!([1, 2, 3])).unwrap();

    let err = store.load("semob:linha_metro").unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_COLLECTION");
    assert_eq!(err.op(), Some("load_snapshot"));
}

#[test]
fn test_identical_documents_have_identical_digests() {
    let (store, _dir) = setup_store();
    let doc = json!({"features": [{"properties": {"a": 1}}]});

    let a = store.save("x:a", &doc).unwrap();
    let b = store.save("x:b", &doc).unwrap();
    assert_eq!(a.digest, b.digest);
    assert_eq!(a.bytes, b.bytes);
}
