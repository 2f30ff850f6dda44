use crate::model::{AssetKey, MetadataValue, PartitionsSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One asset's observable definition attributes at a point in time
///
/// Ordered collections keep serialization (and therefore digests) stable.
/// `upstream_keys` may name assets outside the snapshot; they are opaque
/// identifiers and never dereferenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDefinitionSnapshot {
    pub key: AssetKey,
    #[serde(default)]
    pub code_version: Option<String>,
    #[serde(default)]
    pub upstream_keys: BTreeSet<AssetKey>,
    #[serde(default)]
    pub partitions_definition: Option<PartitionsSpec>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl AssetDefinitionSnapshot {
    /// Create a definition with every optional attribute unset
    pub fn new(key: AssetKey) -> Self {
        Self {
            key,
            code_version: None,
            upstream_keys: BTreeSet::new(),
            partitions_definition: None,
            tags: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_code_version(mut self, version: impl Into<String>) -> Self {
        self.code_version = Some(version.into());
        self
    }

    pub fn with_upstream(mut self, key: AssetKey) -> Self {
        self.upstream_keys.insert(key);
        self
    }

    pub fn with_upstreams<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = AssetKey>,
    {
        self.upstream_keys.extend(keys);
        self
    }

    pub fn with_partitions(mut self, spec: PartitionsSpec) -> Self {
        self.partitions_definition = Some(spec);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_optional_attributes() {
        let def = AssetDefinitionSnapshot::new(AssetKey::from("orders"));
        assert!(def.code_version.is_none());
        assert!(def.partitions_definition.is_none());
        assert!(def.upstream_keys.is_empty());
        assert!(def.tags.is_empty());
        assert!(def.metadata.is_empty());
    }

    #[test]
    fn test_builder_accumulates_upstreams() {
        let def = AssetDefinitionSnapshot::new(AssetKey::from("orders"))
            .with_upstream(AssetKey::from("customers"))
            .with_upstreams([AssetKey::from("raw_orders"), AssetKey::from("customers")]);
        assert_eq!(def.upstream_keys.len(), 2);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let def: AssetDefinitionSnapshot =
            serde_json::from_str(r#"{"key":["orders"],"code_version":"v1"}"#).unwrap();
        assert_eq!(def.key, AssetKey::from("orders"));
        assert_eq!(def.code_version.as_deref(), Some("v1"));
        assert!(def.tags.is_empty());
    }
}
