//! Snapshot parser with validation
//!
//! Parses YAML or JSON and validates schema version, asset keys, time-window
//! boundaries, and key uniqueness before building an `AssetGraphSnapshot`.

#![allow(clippy::result_large_err)]

use crate::errors::{
    io_error, snapshot_validation, unsupported_format, unsupported_schema_version, Result,
};
use crate::snapshot::format_v0::{
    metadata_from_value, metadata_to_value, KeyRef, SnapshotAsset, SnapshotFileV0,
};
use branchdiff_core::errors::{ExError, ExErrorKind};
use branchdiff_core::model::{AssetDefinitionSnapshot, AssetKey, PartitionsSpec};
use branchdiff_core::snapshot::AssetGraphSnapshot;
use branchdiff_core::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Serialization format of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Infer the format from a file extension (`.yaml`, `.yml`, `.json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            "json" => Some(SnapshotFormat::Json),
            _ => None,
        }
    }
}

/// Parse a snapshot file, inferring the format from its extension
///
/// # Errors
///
/// Fails on an unknown extension, an unreadable file, or any validation
/// failure reported by [`parse_snapshot_str`].
pub fn parse_snapshot_file(path: &Path) -> Result<AssetGraphSnapshot> {
    let format = SnapshotFormat::from_path(path).ok_or_else(|| unsupported_format(path))?;
    let content = fs::read_to_string(path).map_err(|e| io_error("snapshot_read", path, e))?;
    parse_snapshot_str(&content, format)
}

/// Parse a snapshot from a string
///
/// # Errors
///
/// - `InvalidSnapshot` for malformed content, bad keys, bad partition
///   boundaries, or duplicate keys
/// - `UnsupportedSchemaVersion` if `schema_version` is not 0
pub fn parse_snapshot_str(content: &str, format: SnapshotFormat) -> Result<AssetGraphSnapshot> {
    let started = Instant::now();
    log_op_start!("snapshot_parse", format = ?format);

    let result = parse_document(content, format).and_then(into_snapshot);
    match &result {
        Ok(snapshot) => log_op_end!(
            "snapshot_parse",
            duration_ms = started.elapsed().as_millis() as u64,
            deployment = snapshot.deployment(),
            asset_count = snapshot.len()
        ),
        Err(err) => log_op_error!(
            "snapshot_parse",
            err.clone(),
            duration_ms = started.elapsed().as_millis() as u64
        ),
    }
    result
}

/// Serialize a snapshot back into Format v0
///
/// # Errors
///
/// Returns a `Serialization` error if the encoder fails.
pub fn write_snapshot_str(snapshot: &AssetGraphSnapshot, format: SnapshotFormat) -> Result<String> {
    let file = to_document(snapshot);
    let encoded = match format {
        SnapshotFormat::Yaml => serde_yaml::to_string(&file).map_err(|e| e.to_string()),
        SnapshotFormat::Json => serde_json::to_string_pretty(&file).map_err(|e| e.to_string()),
    };
    encoded.map_err(|message| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("snapshot_write")
            .with_deployment(snapshot.deployment())
            .with_message(message)
    })
}

fn parse_document(content: &str, format: SnapshotFormat) -> Result<SnapshotFileV0> {
    let file: SnapshotFileV0 = match format {
        SnapshotFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| snapshot_validation(&format!("YAML parse error: {}", e)))?,
        SnapshotFormat::Json => serde_json::from_str(content)
            .map_err(|e| snapshot_validation(&format!("JSON parse error: {}", e)))?,
    };
    validate_document(&file)?;
    Ok(file)
}

/// Validate a parsed snapshot document
fn validate_document(file: &SnapshotFileV0) -> Result<()> {
    if file.schema_version != 0 {
        return Err(unsupported_schema_version(file.schema_version));
    }

    if file.deployment.trim().is_empty() {
        return Err(snapshot_validation("deployment must not be empty"));
    }

    let mut seen = BTreeSet::new();
    for asset in &file.assets {
        let key = to_asset_key(&asset.key)?;
        for dep in &asset.deps {
            to_asset_key(dep).map_err(|e| e.with_asset_key(key.to_string()))?;
        }
        if let Some(spec) = &asset.partitions {
            validate_partitions(spec).map_err(|reason| {
                snapshot_validation(&format!("Invalid partitions for asset {}: {}", key, reason))
                    .with_asset_key(key.to_string())
            })?;
        }
        if !seen.insert(key.clone()) {
            return Err(snapshot_validation(&format!(
                "Duplicate asset key {} in deployment {}",
                key, file.deployment
            ))
            .with_asset_key(key.to_string())
            .with_deployment(file.deployment.clone()));
        }
    }

    Ok(())
}

fn to_asset_key(key: &KeyRef) -> Result<AssetKey> {
    let parsed = match key {
        KeyRef::Path(path) => AssetKey::parse(path),
        KeyRef::Segments(segments) => AssetKey::try_from_segments(segments.clone()),
    };
    parsed.map_err(|e| snapshot_validation(&e.to_string()))
}

fn validate_partitions(spec: &PartitionsSpec) -> std::result::Result<(), String> {
    match spec {
        PartitionsSpec::TimeWindow {
            start, end, fmt, ..
        } => {
            let start_at = parse_boundary(start, fmt.as_deref())
                .ok_or_else(|| format!("start '{}' is not a date or datetime", start))?;
            if let Some(end) = end {
                let end_at = parse_boundary(end, fmt.as_deref())
                    .ok_or_else(|| format!("end '{}' is not a date or datetime", end))?;
                if end_at <= start_at {
                    return Err(format!("end '{}' is not after start '{}'", end, start));
                }
            }
            Ok(())
        }
        PartitionsSpec::Static { partition_keys } => {
            let unique: BTreeSet<&String> = partition_keys.iter().collect();
            if unique.len() != partition_keys.len() {
                return Err("static partition keys must be unique".to_string());
            }
            Ok(())
        }
        PartitionsSpec::Dynamic { name } => {
            if name.trim().is_empty() {
                return Err("dynamic partitions need a name".to_string());
            }
            Ok(())
        }
        PartitionsSpec::Multi { dimensions } => {
            if dimensions.is_empty() {
                return Err("multi partitions need at least one dimension".to_string());
            }
            for (name, dimension) in dimensions {
                validate_partitions(dimension).map_err(|reason| format!("{}: {}", name, reason))?;
            }
            Ok(())
        }
    }
}

/// Parse a partition boundary as a datetime; dates land on midnight.
fn parse_boundary(value: &str, fmt: Option<&str>) -> Option<NaiveDateTime> {
    if let Some(fmt) = fmt {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(at);
        }
        if let Ok(day) = NaiveDate::parse_from_str(value, fmt) {
            return day.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.naive_utc());
    }
    for pattern in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d-%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(at);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn into_snapshot(file: SnapshotFileV0) -> Result<AssetGraphSnapshot> {
    let deployment = file.deployment;
    let mut definitions = Vec::with_capacity(file.assets.len());
    for asset in file.assets {
        definitions.push(into_definition(asset)?);
    }
    Ok(AssetGraphSnapshot::from_definitions(deployment, definitions)?)
}

fn into_definition(asset: SnapshotAsset) -> Result<AssetDefinitionSnapshot> {
    let key = to_asset_key(&asset.key)?;
    let mut def = AssetDefinitionSnapshot::new(key.clone());
    def.code_version = asset.code_version;
    for dep in &asset.deps {
        def.upstream_keys.insert(to_asset_key(dep)?);
    }
    def.partitions_definition = asset.partitions;
    def.tags = asset.tags;
    for (name, value) in asset.metadata {
        let value = metadata_from_value(value).map_err(|reason| {
            snapshot_validation(&format!(
                "Invalid metadata '{}' for asset {}: {}",
                name, key, reason
            ))
            .with_asset_key(key.to_string())
        })?;
        def.metadata.insert(name, value);
    }
    Ok(def)
}

fn to_document(snapshot: &AssetGraphSnapshot) -> SnapshotFileV0 {
    SnapshotFileV0 {
        schema_version: 0,
        deployment: snapshot.deployment().to_string(),
        assets: snapshot
            .definitions()
            .map(|def| SnapshotAsset {
                key: KeyRef::Segments(def.key.segments().to_vec()),
                code_version: def.code_version.clone(),
                deps: def
                    .upstream_keys
                    .iter()
                    .map(|k| KeyRef::Segments(k.segments().to_vec()))
                    .collect(),
                partitions: def.partitions_definition.clone(),
                tags: def.tags.clone(),
                metadata: def
                    .metadata
                    .iter()
                    .map(|(name, value)| (name.clone(), metadata_to_value(value)))
                    .collect(),
            })
            .collect(),
    }
}
