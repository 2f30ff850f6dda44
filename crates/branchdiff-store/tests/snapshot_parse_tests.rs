// Integration tests for snapshot file parsing

use branchdiff_core::errors::ExErrorKind;
use branchdiff_core::model::{AssetKey, MetadataValue};
use branchdiff_store::snapshot::{parse_snapshot_file, write_snapshot_str, SnapshotFormat};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn key(s: &str) -> AssetKey {
    AssetKey::parse(s).unwrap()
}

#[test]
fn test_parse_prod_fixture() {
    // Given: the base deployment snapshot
    let path = fixtures_dir().join("prod.yaml");

    // When: we parse it
    let result = parse_snapshot_file(&path);

    // Then: every asset is present, including the list-form key
    assert!(result.is_ok(), "Should parse prod: {:?}", result.err());
    let snapshot = result.unwrap();
    assert_eq!(snapshot.deployment(), "prod");
    assert_eq!(snapshot.len(), 5);
    assert!(snapshot.contains_key(&key("legacy/daily_report")));

    let returns = snapshot.get(&key("sales/returns")).unwrap();
    assert_eq!(returns.code_version.as_deref(), Some("v3"));
    assert!(returns.upstream_keys.contains(&key("sales/orders")));
}

#[test]
fn test_parse_typed_metadata() {
    let snapshot = parse_snapshot_file(&fixtures_dir().join("pr-42.yaml")).unwrap();
    let revenue = snapshot.get(&key("marts/revenue")).unwrap();
    assert_eq!(
        revenue.metadata["dashboard"],
        MetadataValue::Url("https://dash.example.com/revenue".to_string())
    );
}

#[test]
fn test_parse_json_fixture() {
    let snapshot = parse_snapshot_file(&fixtures_dir().join("pr-7.json")).unwrap();
    assert_eq!(snapshot.deployment(), "pr-7");
    assert!(snapshot.contains_key(&key("raw/customers")));
}

#[test]
fn test_reject_invalid_schema_version() {
    let err = parse_snapshot_file(&fixtures_dir().join("invalid_schema_version.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnsupportedSchemaVersion);
    assert!(err.to_string().contains("Unsupported schema_version: 3"));
}

#[test]
fn test_reject_duplicate_keys_across_forms() {
    let err = parse_snapshot_file(&fixtures_dir().join("duplicate_keys.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidSnapshot);
    assert_eq!(err.asset_key(), Some("sales/orders"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parse_snapshot_file(&fixtures_dir().join("does-not-exist.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
}

#[test]
fn test_unknown_extension_rejected() {
    let err = parse_snapshot_file(&fixtures_dir().join("prod.txt")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_written_yaml_parses_back() {
    let original = parse_snapshot_file(&fixtures_dir().join("pr-42.yaml")).unwrap();
    let yaml = write_snapshot_str(&original, SnapshotFormat::Yaml).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pr-42.yaml");
    std::fs::write(&path, yaml).unwrap();

    assert_eq!(parse_snapshot_file(&path).unwrap(), original);
}
