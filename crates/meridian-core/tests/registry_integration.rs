//! Integration tests for loading registries from JSON

use std::io::Write;

use meridian_core::{CrsKind, CrsRegistry, Error, InMemoryRegistry, RegistryDocument};

use test_support::*;

#[test]
fn test_fixture_loads_and_indexes() {
    let registry = InMemoryRegistry::from_json_str(FIXTURE_JSON).unwrap();
    assert_eq!(registry.len(), 5);
    assert_eq!(registry.crs(WORLD_MERCATOR).unwrap().kind(), CrsKind::Projected);
    assert_eq!(registry.crs(NAVD88).unwrap().kind(), CrsKind::Vertical);

    let projections = registry.projections_based_on(WGS84);
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].code, WORLD_MERCATOR);

    let from_ed50 = registry.transformations_from(ED50);
    assert_eq!(from_ed50.len(), 1);
    assert_eq!(from_ed50[0].accuracy(), Some(10.0));
    assert_eq!(registry.transformations_to(WGS84).len(), 1);
    assert!(registry.concatenated_operations_from(ED50).is_empty());
}

#[test]
fn test_fixture_datums_carry_reference_shifts() {
    let registry = fixture_registry();
    let ed50 = registry.crs(ED50).unwrap();
    let shift = ed50.geodetic_datum().unwrap().reference_shift().unwrap();
    assert_eq!(shift.translation.x, -87.0);
    assert_eq!(shift.rotation.z, 0.0);
    assert_eq!(shift.scale_ppm, 0.0);
}

#[test]
fn test_from_json_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE_JSON.as_bytes()).unwrap();
    let registry = InMemoryRegistry::from_json_path(file.path()).unwrap();
    assert_eq!(registry.len(), 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = InMemoryRegistry::from_json_path(dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_malformed_document_is_registry_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"crs\": [ { \"code\": \"not a number\" } ] }").unwrap();
    let result = InMemoryRegistry::from_json_path(file.path());
    assert!(matches!(result, Err(Error::Registry { .. })));
}

#[test]
fn test_dangling_operation_reference_is_rejected() {
    let mut document: RegistryDocument = serde_json::from_str(FIXTURE_JSON).unwrap();
    document.operations[0].target_crs = Some(meridian_core::CrsCode(1));
    let err = InMemoryRegistry::from_document(document).unwrap_err();
    assert!(matches!(err, Error::Registry { .. }));
    assert!(err.to_string().contains("EPSG:1"));
}

#[test]
fn test_document_round_trips_through_serde() {
    let document: RegistryDocument = serde_json::from_str(FIXTURE_JSON).unwrap();
    let json = serde_json::to_string(&document).unwrap();
    let again: RegistryDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(again.crs, document.crs);
    assert_eq!(again.operations, document.operations);
}
