//! branchdiff store - snapshot files and deployment resolution
//!
//! Provides:
//! - Snapshot Format v0 schema, parser, and writer (YAML/JSON)
//! - `SnapshotResolver` implementations mapping deployment names to snapshots

pub mod errors;
pub mod resolver;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use resolver::{
    resolve_pair, DirectorySnapshotResolver, InMemorySnapshotResolver, SnapshotPair,
    SnapshotResolver, DEFAULT_BASE_DEPLOYMENT,
};
pub use snapshot::{parse_snapshot_file, parse_snapshot_str, SnapshotFormat};
