//! Branch-versus-base asset graph diff.
//!
//! Compares two [`AssetGraphSnapshot`](crate::snapshot::AssetGraphSnapshot)s
//! and classifies every branch asset as new, changed (with the dimensions
//! that changed), or unchanged. Base-only assets are reported as removed.
//!
//! ## Entry point
//!
//! ```ignore
//! use branchdiff_core::diff::compute_graph_diff;
//!
//! let diff = compute_graph_diff(&base, &branch);
//! let summary = branchdiff_core::diff::render_human_summary(&diff);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce equal (and identically
//!   serialized) diffs.
//! - **Key partitioning**: `changes` keys and `removed_keys` are disjoint and
//!   together cover both snapshots' keys.
//! - **NEW exclusivity**: a new asset carries `{NEW}` and nothing else.
//! - **Dimension independence**: each reason depends on one dimension only.

pub mod comparator;
pub mod detail;
pub mod engine;
pub mod human_summary;
pub mod labels;
pub mod model;

pub use comparator::compare_definitions;
pub use detail::{explain_asset, explain_change, ChangeDetail, MapDelta, SetDelta, ValueChange};
pub use engine::{compute_graph_diff, compute_graph_diff_in_context, DIFF_SCHEMA_VERSION};
pub use human_summary::render_human_summary;
pub use labels::{project_labels, AssetLabel, ChangeLabel};
pub use model::{AssetChangeResult, ChangeReason, DiffIdentity, DiffStats, GraphDiff};
