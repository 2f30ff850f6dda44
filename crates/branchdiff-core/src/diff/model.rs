//! Graph diff output types.
//!
//! Collections are `BTreeMap`/`BTreeSet` so that iteration and serialization
//! are deterministic. `changes` is serialized as a key-ordered list of
//! [`AssetChangeResult`] because asset keys are not strings.

use crate::model::AssetKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why an asset is classified as changed in the branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeReason {
    /// No base definition exists; exclusive with every other reason
    New,
    CodeVersionChanged,
    DependenciesChanged,
    PartitionsDefinitionChanged,
    TagsChanged,
    MetadataChanged,
}

impl ChangeReason {
    /// Every reason, in declaration order
    pub const ALL: [ChangeReason; 6] = [
        ChangeReason::New,
        ChangeReason::CodeVersionChanged,
        ChangeReason::DependenciesChanged,
        ChangeReason::PartitionsDefinitionChanged,
        ChangeReason::TagsChanged,
        ChangeReason::MetadataChanged,
    ];

    /// Stable wire name (`CODE_VERSION_CHANGED`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeReason::New => "NEW",
            ChangeReason::CodeVersionChanged => "CODE_VERSION_CHANGED",
            ChangeReason::DependenciesChanged => "DEPENDENCIES_CHANGED",
            ChangeReason::PartitionsDefinitionChanged => "PARTITIONS_DEFINITION_CHANGED",
            ChangeReason::TagsChanged => "TAGS_CHANGED",
            ChangeReason::MetadataChanged => "METADATA_CHANGED",
        }
    }

    /// Human-facing dimension name for detail views
    pub fn dimension(&self) -> &'static str {
        match self {
            ChangeReason::New => "new asset",
            ChangeReason::CodeVersionChanged => "code version",
            ChangeReason::DependenciesChanged => "dependencies",
            ChangeReason::PartitionsDefinitionChanged => "partitions definition",
            ChangeReason::TagsChanged => "tags",
            ChangeReason::MetadataChanged => "metadata",
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one branch asset; empty `reasons` means unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetChangeResult {
    pub key: AssetKey,
    pub reasons: BTreeSet<ChangeReason>,
}

impl AssetChangeResult {
    pub fn is_unchanged(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn is_new(&self) -> bool {
        self.reasons.contains(&ChangeReason::New)
    }
}

/// Which snapshots were compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffIdentity {
    pub base_deployment: String,
    /// Snapshot digest of the base graph (deployment name excluded)
    pub base_digest: String,
    pub branch_deployment: String,
    pub branch_digest: String,
}

impl DiffIdentity {
    /// True when both graphs declare exactly the same definitions
    pub fn graphs_identical(&self) -> bool {
        !self.base_digest.is_empty() && self.base_digest == self.branch_digest
    }
}

/// Full-graph classification of a branch against its base
///
/// Every branch key appears exactly once in `changes`. Keys only in the base
/// are listed in `removed_keys`, which is disjoint from `changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiff {
    /// Schema version of this structure (always 1)
    pub diff_schema_version: u32,
    pub identity: DiffIdentity,
    #[serde(with = "changes_as_list")]
    pub changes: BTreeMap<AssetKey, BTreeSet<ChangeReason>>,
    pub removed_keys: BTreeSet<AssetKey>,
}

impl GraphDiff {
    /// Reasons recorded for a branch key; `None` if the key is not in the branch
    pub fn reasons(&self, key: &AssetKey) -> Option<&BTreeSet<ChangeReason>> {
        self.changes.get(key)
    }

    /// Per-asset results in key order
    pub fn results(&self) -> impl Iterator<Item = AssetChangeResult> + '_ {
        self.changes.iter().map(|(key, reasons)| AssetChangeResult {
            key: key.clone(),
            reasons: reasons.clone(),
        })
    }

    /// "Asset has any change": non-empty reasons, or removed from the branch
    pub fn has_any_change(&self, key: &AssetKey) -> bool {
        self.removed_keys.contains(key)
            || self
                .changes
                .get(key)
                .map(|reasons| !reasons.is_empty())
                .unwrap_or(false)
    }

    /// Every key for which [`GraphDiff::has_any_change`] holds
    pub fn changed_keys(&self) -> BTreeSet<AssetKey> {
        self.changes
            .iter()
            .filter(|(_, reasons)| !reasons.is_empty())
            .map(|(key, _)| key.clone())
            .chain(self.removed_keys.iter().cloned())
            .collect()
    }

    /// True when nothing was added, changed, or removed
    pub fn is_unchanged(&self) -> bool {
        self.removed_keys.is_empty() && self.changes.values().all(BTreeSet::is_empty)
    }

    /// Counts per classification and per reason
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            branch_assets: self.changes.len(),
            removed: self.removed_keys.len(),
            ..DiffStats::default()
        };
        for reasons in self.changes.values() {
            if reasons.is_empty() {
                stats.unchanged += 1;
            } else if reasons.contains(&ChangeReason::New) {
                stats.new += 1;
            } else {
                stats.changed += 1;
            }
            for reason in reasons {
                *stats.by_reason.entry(*reason).or_insert(0) += 1;
            }
        }
        stats
    }
}

/// Aggregate counts over a [`GraphDiff`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub branch_assets: usize,
    pub new: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub by_reason: BTreeMap<ChangeReason, usize>,
}

mod changes_as_list {
    use super::{AssetChangeResult, ChangeReason};
    use crate::model::AssetKey;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::{BTreeMap, BTreeSet};

    pub fn serialize<S>(
        changes: &BTreeMap<AssetKey, BTreeSet<ChangeReason>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let list: Vec<AssetChangeResult> = changes
            .iter()
            .map(|(key, reasons)| AssetChangeResult {
                key: key.clone(),
                reasons: reasons.clone(),
            })
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<AssetKey, BTreeSet<ChangeReason>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<AssetChangeResult>::deserialize(deserializer)?;
        let mut changes = BTreeMap::new();
        for result in list {
            if changes.insert(result.key.clone(), result.reasons).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "asset {} listed twice in changes",
                    result.key
                )));
            }
        }
        Ok(changes)
    }
}
