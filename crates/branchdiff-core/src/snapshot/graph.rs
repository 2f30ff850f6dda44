//! Asset graph snapshot.

use crate::errors::{BranchDiffError, Result};
use crate::model::{AssetDefinitionSnapshot, AssetKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One deployment's full set of declared assets at a code revision
///
/// Keys are unique by construction: [`AssetGraphSnapshot::from_definitions`]
/// rejects duplicates. There is no mutation API; a new deployment build
/// produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SnapshotRepr", try_from = "SnapshotRepr")]
pub struct AssetGraphSnapshot {
    deployment: String,
    assets: BTreeMap<AssetKey, AssetDefinitionSnapshot>,
}

/// Wire form: definitions as a key-ordered list (asset keys are not strings,
/// so they cannot be JSON object keys)
#[derive(Serialize, Deserialize)]
struct SnapshotRepr {
    deployment: String,
    assets: Vec<AssetDefinitionSnapshot>,
}

impl From<AssetGraphSnapshot> for SnapshotRepr {
    fn from(snapshot: AssetGraphSnapshot) -> Self {
        SnapshotRepr {
            deployment: snapshot.deployment,
            assets: snapshot.assets.into_values().collect(),
        }
    }
}

impl TryFrom<SnapshotRepr> for AssetGraphSnapshot {
    type Error = BranchDiffError;

    fn try_from(repr: SnapshotRepr) -> Result<Self> {
        AssetGraphSnapshot::from_definitions(repr.deployment, repr.assets)
    }
}

impl AssetGraphSnapshot {
    /// A snapshot with no assets
    pub fn empty(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            assets: BTreeMap::new(),
        }
    }

    /// Build a snapshot, failing fast on duplicate keys
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAssetKey` naming the first repeated key.
    pub fn from_definitions<I>(deployment: impl Into<String>, definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = AssetDefinitionSnapshot>,
    {
        let deployment = deployment.into();
        let mut assets = BTreeMap::new();
        for def in definitions {
            if assets.contains_key(&def.key) {
                return Err(BranchDiffError::DuplicateAssetKey {
                    asset_key: def.key.to_string(),
                    deployment,
                });
            }
            assets.insert(def.key.clone(), def);
        }
        Ok(Self { deployment, assets })
    }

    /// Deployment this snapshot was taken from (e.g. `prod`, `pr-123`)
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn get(&self, key: &AssetKey) -> Option<&AssetDefinitionSnapshot> {
        self.assets.get(key)
    }

    pub fn contains_key(&self, key: &AssetKey) -> bool {
        self.assets.contains_key(key)
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.assets.keys()
    }

    /// Definitions in ascending key order
    pub fn definitions(&self) -> impl Iterator<Item = &AssetDefinitionSnapshot> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
