//! Snapshot files.
//!
//! ## Responsibilities
//!
//! - Format v0 schema for one deployment's asset graph (YAML or JSON)
//! - Parsing with validation into `AssetGraphSnapshot`
//! - Writing a snapshot back out in Format v0
//!
//! ## Non-Responsibilities
//!
//! - Deciding which file belongs to which deployment (`crate::resolver`)
//! - Comparing snapshots (`branchdiff-core`)

pub mod format_v0;
pub mod parser;

pub use format_v0::SnapshotFileV0;
pub use parser::{parse_snapshot_file, parse_snapshot_str, write_snapshot_str, SnapshotFormat};
