//! Per-asset change classification.
//!
//! Each dimension is compared independently and contributes its reason iff
//! its equality check fails. A missing base definition short-circuits to
//! `{NEW}`.

use crate::diff::model::ChangeReason;
use crate::model::AssetDefinitionSnapshot;
use std::collections::BTreeSet;

/// Classify a branch definition against its base counterpart.
///
/// `base` is `None` when the key does not exist in the base snapshot.
///
/// ```
/// use branchdiff_core::diff::{compare_definitions, ChangeReason};
/// use branchdiff_core::model::{AssetDefinitionSnapshot, AssetKey};
///
/// let base = AssetDefinitionSnapshot::new(AssetKey::from("orders")).with_code_version("v1");
/// let branch = base.clone().with_code_version("v2");
/// let reasons = compare_definitions(Some(&base), &branch);
/// assert_eq!(reasons.into_iter().collect::<Vec<_>>(), vec![ChangeReason::CodeVersionChanged]);
/// ```
pub fn compare_definitions(
    base: Option<&AssetDefinitionSnapshot>,
    branch: &AssetDefinitionSnapshot,
) -> BTreeSet<ChangeReason> {
    let mut reasons = BTreeSet::new();
    let Some(base) = base else {
        reasons.insert(ChangeReason::New);
        return reasons;
    };

    if code_version_changed(base, branch) {
        reasons.insert(ChangeReason::CodeVersionChanged);
    }
    if dependencies_changed(base, branch) {
        reasons.insert(ChangeReason::DependenciesChanged);
    }
    if partitions_changed(base, branch) {
        reasons.insert(ChangeReason::PartitionsDefinitionChanged);
    }
    if tags_changed(base, branch) {
        reasons.insert(ChangeReason::TagsChanged);
    }
    if metadata_changed(base, branch) {
        reasons.insert(ChangeReason::MetadataChanged);
    }
    reasons
}

/// None/None is equal; None vs Some, or differing strings, is a change
pub(crate) fn code_version_changed(
    base: &AssetDefinitionSnapshot,
    branch: &AssetDefinitionSnapshot,
) -> bool {
    base.code_version != branch.code_version
}

/// Set equality; order of declaration is irrelevant
pub(crate) fn dependencies_changed(
    base: &AssetDefinitionSnapshot,
    branch: &AssetDefinitionSnapshot,
) -> bool {
    base.upstream_keys != branch.upstream_keys
}

/// Structural equality, including added or removed partitioning
pub(crate) fn partitions_changed(
    base: &AssetDefinitionSnapshot,
    branch: &AssetDefinitionSnapshot,
) -> bool {
    base.partitions_definition != branch.partitions_definition
}

pub(crate) fn tags_changed(
    base: &AssetDefinitionSnapshot,
    branch: &AssetDefinitionSnapshot,
) -> bool {
    base.tags != branch.tags
}

pub(crate) fn metadata_changed(
    base: &AssetDefinitionSnapshot,
    branch: &AssetDefinitionSnapshot,
) -> bool {
    base.metadata != branch.metadata
}
