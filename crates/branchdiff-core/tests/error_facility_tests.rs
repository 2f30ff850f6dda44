use branchdiff_core::core_types::{RequestContext, TraceId};
use branchdiff_core::errors::{BranchDiffError, ExError, ExErrorKind};
use branchdiff_core::model::AssetKey;
use branchdiff_core::snapshot::{AssetGraphSnapshot, DefinitionIndex};
use branchdiff_core::AssetDefinitionSnapshot;

#[test]
fn test_duplicate_key_verifiable_by_kind() {
    let err = AssetGraphSnapshot::from_definitions(
        "prod",
        vec![
            AssetDefinitionSnapshot::new(AssetKey::from("orders")),
            AssetDefinitionSnapshot::new(AssetKey::from("orders")),
        ],
    )
    .unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateAssetKey);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_ASSET_KEY");
    assert_eq!(ex_err.asset_key(), Some("orders"));
    assert_eq!(ex_err.deployment(), Some("prod"));
}

#[test]
fn test_invalid_asset_key_structured_fields() {
    let err = AssetKey::parse("analytics//orders").unwrap_err();
    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidAssetKey);
    assert_eq!(ex_err.op(), Some("parse_asset_key"));
    assert!(ex_err.message().contains("analytics//orders"));
}

#[test]
fn test_not_found_lists_candidates() {
    let mut index = DefinitionIndex::new("prod");
    index
        .insert_definition(AssetDefinitionSnapshot::new(AssetKey::from("orders")))
        .unwrap();
    index
        .insert_definition(AssetDefinitionSnapshot::new(
            AssetKey::parse("raw/customers").unwrap(),
        ))
        .unwrap();

    let err = index.get_definition(&AssetKey::from("missing")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not find asset 'missing'. Found: 'orders', 'raw/customers'"
    );

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::DefinitionNotFound);
    assert_eq!(
        ex_err.candidates(),
        Some(&["orders".to_string(), "raw/customers".to_string()][..])
    );
}

#[test]
fn test_conflicting_discovery_maps_to_duplicate() {
    let err = BranchDiffError::ConflictingDefinition {
        asset_key: "orders".to_string(),
    };
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateAssetKey);
    assert_eq!(ex_err.op(), Some("load_definitions"));
}

#[test]
fn test_display_format() {
    let ex_err = ExError::new(ExErrorKind::SnapshotNotFound)
        .with_op("resolve_snapshot")
        .with_deployment("pr-4")
        .with_message("no snapshot file");

    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_SNAPSHOT_NOT_FOUND] in operation 'resolve_snapshot'"));
    assert!(rendered.contains("no snapshot file"));
    assert!(rendered.contains("(deployment: pr-4)"));
}

#[test]
fn test_request_context_stamped_on_error() {
    let ctx = RequestContext::new().with_trace_id(TraceId::from_string("trace-7"));
    let ex_err = ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("snapshot_parse")
        .with_request_context(&ctx);

    assert_eq!(ex_err.request_id(), Some(&ctx.request_id));
    assert_eq!(ex_err.trace_id().map(|t| t.as_str()), Some("trace-7"));
    assert!(ex_err
        .to_string()
        .contains(&format!("(request_id: {})", ctx.request_id)));
}

#[test]
fn test_error_without_context_has_no_request_id() {
    let ex_err = ExError::new(ExErrorKind::Io).with_message("disk full");
    assert!(ex_err.request_id().is_none());
    assert!(!ex_err.to_string().contains("request_id"));
}

#[test]
fn test_error_kind_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::InvalidAssetKey,
        ExErrorKind::DuplicateAssetKey,
        ExErrorKind::DefinitionMismatch,
        ExErrorKind::DefinitionNotFound,
        ExErrorKind::InvalidSnapshot,
        ExErrorKind::UnsupportedSchemaVersion,
        ExErrorKind::SnapshotNotFound,
        ExErrorKind::Io,
        ExErrorKind::Serialization,
        ExErrorKind::Internal,
    ];
    let codes: std::collections::BTreeSet<&str> = kinds.iter().map(|k| k.code()).collect();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
