//! branchdiff core - asset graph change tracking
//!
//! This crate provides the in-memory model and comparison logic for
//! branch deployments, including:
//! - Asset keys and per-deployment definition snapshots
//! - Graph snapshots with deterministic digests
//! - A caching definition index for deferred and discovered definitions
//! - The change comparator and graph diff engine
//! - Label projection and a Markdown summary of a diff
//!
//! Snapshot files and deployment lookup live in `branchdiff-store`.

pub use branchdiff_core_types as core_types;

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

// Re-export commonly used types
pub use diff::{compare_definitions, compute_graph_diff, ChangeReason, GraphDiff};
pub use errors::{BranchDiffError, ExError, ExErrorKind, Result};
pub use model::{AssetDefinitionSnapshot, AssetKey, MetadataValue, PartitionsSpec};
pub use snapshot::{AssetGraphSnapshot, DefinitionIndex};
