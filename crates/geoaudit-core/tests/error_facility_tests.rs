use geoaudit_core::errors::{ExError, ExErrorKind, GeoAuditError};
use geoaudit_core::policy::{LayerCatalog, LayerPolicy};
use geoaudit_core::FeatureCollection;
use geoaudit_core_types::RunId;
use serde_json::json;

#[test]
fn test_every_kind_has_a_distinct_code() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::InvalidConfig,
        ExErrorKind::InvalidCollection,
        ExErrorKind::InvalidGeometry,
        ExErrorKind::Io,
        ExErrorKind::Serialization,
        ExErrorKind::Persistence,
        ExErrorKind::ExternalService,
        ExErrorKind::Timeout,
        ExErrorKind::Internal,
    ];
    let codes: std::collections::HashSet<&str> = kinds.iter().map(|k| k.code()).collect();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}

#[test]
fn test_duplicate_layer_maps_to_invalid_config_with_layer() {
    let err = LayerCatalog::new(vec![
        ("semob:terminais_onibus", LayerPolicy::default()),
        ("semob:terminais_onibus", LayerPolicy::default()),
    ])
    .unwrap_err();

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(ex.code(), "ERR_INVALID_CONFIG");
    assert_eq!(ex.op(), Some("validate_catalog"));
    assert_eq!(ex.layer(), Some("semob:terminais_onibus"));
}

#[test]
fn test_invalid_collection_maps_to_invalid_collection() {
    let err = FeatureCollection::from_value(&json!({"features": "nope"})).unwrap_err();
    assert!(matches!(err, GeoAuditError::InvalidFeatureCollection { .. }));

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidCollection);
}

#[test]
fn test_run_id_context_is_kept() {
    let run_id = RunId::new();
    let ex = ExError::new(ExErrorKind::Persistence)
        .with_run_id(run_id.clone())
        .with_layer("semob:linha_metro")
        .with_message("rename failed");

    assert_eq!(ex.run_id(), Some(&run_id));
    assert_eq!(ex.message(), "rename failed");
}
