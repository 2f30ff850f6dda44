//! Graph diff computation engine.
//!
//! The core entry point is [`compute_graph_diff`], which walks every branch
//! key, classifies it against the base with
//! [`compare_definitions`](crate::diff::compare_definitions), and collects
//! base-only keys as removed.

use crate::core_types::RequestContext;
use crate::diff::comparator::compare_definitions;
use crate::diff::model::{DiffIdentity, GraphDiff};
use crate::snapshot::{compute_snapshot_digest, AssetGraphSnapshot};
use crate::{log_op_end, log_op_start};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Current `GraphDiff::diff_schema_version`
pub const DIFF_SCHEMA_VERSION: u32 = 1;

/// Classify every asset of `branch` against `base`.
///
/// Infallible and deterministic: the same pair always yields an equal
/// `GraphDiff`. Every branch key appears exactly once in `changes`; base-only
/// keys land in `removed_keys`.
pub fn compute_graph_diff(base: &AssetGraphSnapshot, branch: &AssetGraphSnapshot) -> GraphDiff {
    let started = Instant::now();
    log_op_start!(
        "compute_graph_diff",
        base_deployment = base.deployment(),
        branch_deployment = branch.deployment(),
        base_assets = base.len(),
        branch_assets = branch.len()
    );

    let changes: BTreeMap<_, _> = branch
        .definitions()
        .map(|def| (def.key.clone(), compare_definitions(base.get(&def.key), def)))
        .collect();

    let removed_keys: BTreeSet<_> = base
        .keys()
        .filter(|key| !branch.contains_key(key))
        .cloned()
        .collect();

    let diff = GraphDiff {
        diff_schema_version: DIFF_SCHEMA_VERSION,
        identity: DiffIdentity {
            base_deployment: base.deployment().to_string(),
            base_digest: snapshot_digest_or_empty(base),
            branch_deployment: branch.deployment().to_string(),
            branch_digest: snapshot_digest_or_empty(branch),
        },
        changes,
        removed_keys,
    };

    let stats = diff.stats();
    log_op_end!(
        "compute_graph_diff",
        duration_ms = started.elapsed().as_millis() as u64,
        changed_assets = stats.new + stats.changed,
        removed_assets = stats.removed
    );
    diff
}

/// [`compute_graph_diff`] inside a span carrying the run's correlation ids
pub fn compute_graph_diff_in_context(
    base: &AssetGraphSnapshot,
    branch: &AssetGraphSnapshot,
    ctx: &RequestContext,
) -> GraphDiff {
    let span = tracing::info_span!(
        "graph_diff",
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id.as_ref().map(|t| t.as_str()).unwrap_or("")
    );
    let _guard = span.enter();
    compute_graph_diff(base, branch)
}

// Digest failure only affects the identity block, never classification.
fn snapshot_digest_or_empty(snapshot: &AssetGraphSnapshot) -> String {
    match compute_snapshot_digest(snapshot) {
        Ok(digest) => digest,
        Err(err) => {
            tracing::warn!(
                deployment = snapshot.deployment(),
                error = %err,
                "snapshot digest unavailable"
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::ChangeReason;
    use crate::model::{AssetDefinitionSnapshot, AssetKey};

    fn snap(deployment: &str, defs: Vec<AssetDefinitionSnapshot>) -> AssetGraphSnapshot {
        AssetGraphSnapshot::from_definitions(deployment, defs).unwrap()
    }

    #[test]
    fn test_empty_graphs() {
        let diff = compute_graph_diff(
            &AssetGraphSnapshot::empty("prod"),
            &AssetGraphSnapshot::empty("pr-1"),
        );
        assert!(diff.changes.is_empty());
        assert!(diff.removed_keys.is_empty());
        assert!(diff.is_unchanged());
        assert!(diff.identity.graphs_identical());
        assert_eq!(diff.diff_schema_version, DIFF_SCHEMA_VERSION);
    }

    #[test]
    fn test_new_changed_removed() {
        let a = AssetDefinitionSnapshot::new(AssetKey::from("a")).with_code_version("v1");
        let b = AssetDefinitionSnapshot::new(AssetKey::from("b"));
        let c = AssetDefinitionSnapshot::new(AssetKey::from("c"));

        let base = snap("prod", vec![a.clone(), b]);
        let branch = snap("pr-1", vec![a.with_code_version("v2"), c]);
        let diff = compute_graph_diff(&base, &branch);

        assert_eq!(
            diff.reasons(&AssetKey::from("a")),
            Some(&BTreeSet::from([ChangeReason::CodeVersionChanged]))
        );
        assert_eq!(
            diff.reasons(&AssetKey::from("c")),
            Some(&BTreeSet::from([ChangeReason::New]))
        );
        assert_eq!(diff.reasons(&AssetKey::from("b")), None);
        assert_eq!(diff.removed_keys, BTreeSet::from([AssetKey::from("b")]));
        assert_eq!(diff.identity.base_deployment, "prod");
        assert_eq!(diff.identity.branch_deployment, "pr-1");
        assert!(!diff.identity.graphs_identical());
    }
}
