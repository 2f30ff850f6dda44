//! On-demand change detail for a single asset.
//!
//! The classification in [`GraphDiff`](crate::diff::GraphDiff) is one boolean
//! per dimension. Detail views need to know *what* moved: which upstream keys
//! were added, which tag keys changed. [`explain_change`] computes that
//! without altering the classification contract: a dimension carries detail
//! iff its reason is present.

use crate::diff::comparator::{
    code_version_changed, compare_definitions, dependencies_changed, metadata_changed,
    partitions_changed, tags_changed,
};
use crate::diff::model::ChangeReason;
use crate::model::{AssetDefinitionSnapshot, AssetKey, PartitionsSpec};
use crate::snapshot::AssetGraphSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Old/new pair for a scalar dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    pub old: T,
    pub new: T,
}

/// Added/removed members of a set dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDelta {
    pub added: Vec<AssetKey>,
    pub removed: Vec<AssetKey>,
}

/// Added/removed/changed entry keys of a map dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

/// Per-dimension explanation of one asset's classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    pub key: AssetKey,
    pub reasons: BTreeSet<ChangeReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_version: Option<ValueChange<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<SetDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions_definition: Option<ValueChange<Option<PartitionsSpec>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<MapDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MapDelta>,
}

/// Explain how `branch` differs from `base`.
///
/// A new asset (`base == None`) has reasons `{NEW}` and no dimension detail.
pub fn explain_change(
    base: Option<&AssetDefinitionSnapshot>,
    branch: &AssetDefinitionSnapshot,
) -> ChangeDetail {
    let reasons = compare_definitions(base, branch);
    let mut detail = ChangeDetail {
        key: branch.key.clone(),
        reasons,
        code_version: None,
        dependencies: None,
        partitions_definition: None,
        tags: None,
        metadata: None,
    };
    let Some(base) = base else {
        return detail;
    };

    if code_version_changed(base, branch) {
        detail.code_version = Some(ValueChange {
            old: base.code_version.clone(),
            new: branch.code_version.clone(),
        });
    }
    if dependencies_changed(base, branch) {
        detail.dependencies = Some(SetDelta {
            added: branch
                .upstream_keys
                .difference(&base.upstream_keys)
                .cloned()
                .collect(),
            removed: base
                .upstream_keys
                .difference(&branch.upstream_keys)
                .cloned()
                .collect(),
        });
    }
    if partitions_changed(base, branch) {
        detail.partitions_definition = Some(ValueChange {
            old: base.partitions_definition.clone(),
            new: branch.partitions_definition.clone(),
        });
    }
    if tags_changed(base, branch) {
        detail.tags = Some(map_delta(&base.tags, &branch.tags));
    }
    if metadata_changed(base, branch) {
        detail.metadata = Some(map_delta(&base.metadata, &branch.metadata));
    }
    detail
}

/// Explain one key across two snapshots; `None` if the branch lacks the key.
pub fn explain_asset(
    base: &AssetGraphSnapshot,
    branch: &AssetGraphSnapshot,
    key: &AssetKey,
) -> Option<ChangeDetail> {
    let branch_def = branch.get(key)?;
    Some(explain_change(base.get(key), branch_def))
}

fn map_delta<V: PartialEq>(old: &BTreeMap<String, V>, new: &BTreeMap<String, V>) -> MapDelta {
    let mut delta = MapDelta::default();
    for (key, new_value) in new {
        match old.get(key) {
            None => delta.added.push(key.clone()),
            Some(old_value) if old_value != new_value => delta.changed.push(key.clone()),
            Some(_) => {}
        }
    }
    delta.removed = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .cloned()
        .collect();
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetadataValue;

    fn base() -> AssetDefinitionSnapshot {
        AssetDefinitionSnapshot::new(AssetKey::from("orders"))
            .with_code_version("v1")
            .with_upstream(AssetKey::from("raw_orders"))
            .with_tag("section", "produce")
            .with_tag("team", "growth")
            .with_metadata("expected_columns", MetadataValue::text_list(["id"]))
    }

    #[test]
    fn test_new_asset_has_no_dimension_detail() {
        let detail = explain_change(None, &base());
        assert_eq!(detail.reasons, BTreeSet::from([ChangeReason::New]));
        assert!(detail.code_version.is_none());
        assert!(detail.dependencies.is_none());
        assert!(detail.tags.is_none());
    }

    #[test]
    fn test_dependency_delta() {
        let mut branch = base().with_upstream(AssetKey::from("customers"));
        branch.upstream_keys.remove(&AssetKey::from("raw_orders"));
        let detail = explain_change(Some(&base()), &branch);
        let deps = detail.dependencies.unwrap();
        assert_eq!(deps.added, vec![AssetKey::from("customers")]);
        assert_eq!(deps.removed, vec![AssetKey::from("raw_orders")]);
    }

    #[test]
    fn test_tag_delta_separates_kinds() {
        let mut branch = base()
            .with_tag("section", "dairy")
            .with_tag("type", "perishable");
        branch.tags.remove("team");
        let tags = explain_change(Some(&base()), &branch).tags.unwrap();
        assert_eq!(tags.added, vec!["type"]);
        assert_eq!(tags.removed, vec!["team"]);
        assert_eq!(tags.changed, vec!["section"]);
    }

    #[test]
    fn test_detail_present_iff_reason_present() {
        let branch = base().with_code_version("v2");
        let detail = explain_change(Some(&base()), &branch);
        assert_eq!(
            detail.reasons,
            BTreeSet::from([ChangeReason::CodeVersionChanged])
        );
        assert_eq!(
            detail.code_version,
            Some(ValueChange {
                old: Some("v1".to_string()),
                new: Some("v2".to_string())
            })
        );
        assert!(detail.metadata.is_none());
        assert!(detail.partitions_definition.is_none());
    }

    #[test]
    fn test_explain_asset_absent_from_branch() {
        let base_snap = AssetGraphSnapshot::from_definitions("prod", vec![base()]).unwrap();
        let branch_snap = AssetGraphSnapshot::empty("pr-1");
        assert!(explain_asset(&base_snap, &branch_snap, &AssetKey::from("orders")).is_none());
    }
}
