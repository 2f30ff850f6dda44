//! Error handling for branchdiff-store
//!
//! Wraps branchdiff-core ExError with store-specific helpers

use branchdiff_core::errors::{ExError, ExErrorKind};
use std::path::{Path, PathBuf};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a snapshot validation error
pub fn snapshot_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("snapshot_parse")
        .with_message(reason.to_string())
}

/// Create an unsupported schema version error
pub fn unsupported_schema_version(found: u32) -> ExError {
    ExError::new(ExErrorKind::UnsupportedSchemaVersion)
        .with_op("snapshot_parse")
        .with_message(format!(
            "Unsupported schema_version: {}. Expected 0",
            found
        ))
}

/// Create an unsupported file format error
pub fn unsupported_format(path: &Path) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("snapshot_parse")
        .with_message(format!(
            "Cannot infer snapshot format from {} (expected .yaml, .yml or .json)",
            path.display()
        ))
}

/// Create a snapshot-not-found error listing the paths that were tried
pub fn snapshot_not_found(deployment: &str, searched: &[PathBuf]) -> ExError {
    let tried = searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>();
    ExError::new(ExErrorKind::SnapshotNotFound)
        .with_op("resolve_snapshot")
        .with_deployment(deployment)
        .with_message(format!(
            "No snapshot for deployment '{}' (tried {})",
            deployment,
            tried.join(", ")
        ))
        .with_candidates(tried)
}

/// Create an invalid deployment name error
pub fn invalid_deployment(deployment: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("resolve_snapshot")
        .with_deployment(deployment)
        .with_message(format!("Invalid deployment name '{}': {}", deployment, reason))
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(format!("{}: {}", path.display(), err))
}
