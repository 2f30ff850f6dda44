//! Asset graph snapshots.
//!
//! ## Responsibilities
//!
//! - Hold one deployment's definitions with unique keys ([`AssetGraphSnapshot`])
//! - Compute deterministic digests for definitions and whole snapshots
//! - Assemble snapshots from eager, deferred, and discovered definitions
//!   ([`DefinitionIndex`])
//!
//! ## Non-Responsibilities
//!
//! - Reading snapshot files or resolving deployment names (`branchdiff-store`)
//! - Comparing snapshots (`crate::diff`)

pub mod digest;
pub mod graph;
pub mod index;

pub use digest::{compute_definition_digest, compute_snapshot_digest};
pub use graph::AssetGraphSnapshot;
pub use index::DefinitionIndex;
