//! Caching definition index.
//!
//! Snapshot producers rarely have every definition in hand up front: some
//! are cheap to build eagerly, some are expensive and registered as loader
//! closures, and some are only discovered by a "load everything" pass whose
//! names are unknown until it runs. [`DefinitionIndex`] unifies the three,
//! loading each definition at most once and validating it before caching.
//!
//! ## Validation
//!
//! - A loaded definition must describe the key it was registered under
//!   (`DefinitionKeyMismatch`).
//! - A discovered definition that shares a key with a registered one must be
//!   identical to it (`ConflictingDefinition`).

use crate::errors::{BranchDiffError, Result};
use crate::model::{AssetDefinitionSnapshot, AssetKey};
use crate::snapshot::graph::AssetGraphSnapshot;
use std::collections::BTreeMap;

/// Deferred constructor for a single definition
pub type DefinitionLoader = Box<dyn Fn() -> AssetDefinitionSnapshot + Send + Sync>;

/// Discovery pass returning definitions whose keys are not known in advance
pub type DiscoveryLoader = Box<dyn Fn() -> Vec<AssetDefinitionSnapshot> + Send + Sync>;

enum DefinitionSource {
    Eager(AssetDefinitionSnapshot),
    Deferred(DefinitionLoader),
}

/// Index of one deployment's definitions with lazy loading and caching
pub struct DefinitionIndex {
    deployment: String,
    sources: BTreeMap<AssetKey, DefinitionSource>,
    cache: BTreeMap<AssetKey, AssetDefinitionSnapshot>,
    discovery: Option<DiscoveryLoader>,
    discovered: Option<Vec<AssetKey>>,
    names: Option<Vec<AssetKey>>,
}

impl std::fmt::Debug for DefinitionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionIndex")
            .field("deployment", &self.deployment)
            .field("registered", &self.sources.len())
            .field("cached", &self.cache.len())
            .field("has_discovery", &self.discovery.is_some())
            .finish()
    }
}

impl DefinitionIndex {
    pub fn new(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            sources: BTreeMap::new(),
            cache: BTreeMap::new(),
            discovery: None,
            discovered: None,
            names: None,
        }
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Register an already-built definition under its own key
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAssetKey` if the key is already registered.
    pub fn insert_definition(&mut self, def: AssetDefinitionSnapshot) -> Result<()> {
        let key = def.key.clone();
        self.register(key, DefinitionSource::Eager(def))
    }

    /// Register a loader that builds the definition for `key` on first access
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAssetKey` if the key is already registered.
    pub fn insert_loader<F>(&mut self, key: AssetKey, loader: F) -> Result<()>
    where
        F: Fn() -> AssetDefinitionSnapshot + Send + Sync + 'static,
    {
        self.register(key, DefinitionSource::Deferred(Box::new(loader)))
    }

    /// Install the discovery pass; it runs at most once, on first need
    pub fn set_discovery<F>(&mut self, loader: F)
    where
        F: Fn() -> Vec<AssetDefinitionSnapshot> + Send + Sync + 'static,
    {
        self.discovery = Some(Box::new(loader));
        self.discovered = None;
        self.names = None;
    }

    fn register(&mut self, key: AssetKey, source: DefinitionSource) -> Result<()> {
        if self.sources.contains_key(&key) {
            return Err(BranchDiffError::DuplicateAssetKey {
                asset_key: key.to_string(),
                deployment: self.deployment.clone(),
            });
        }
        self.sources.insert(key, source);
        self.names = None;
        Ok(())
    }

    /// Run discovery once, validating and caching what it returns.
    ///
    /// Returns the keys discovered (possibly overlapping registered keys).
    fn discover(&mut self) -> Result<Vec<AssetKey>> {
        if let Some(keys) = &self.discovered {
            return Ok(keys.clone());
        }
        let defs = match &self.discovery {
            Some(loader) => loader(),
            None => Vec::new(),
        };

        let mut keys = Vec::with_capacity(defs.len());
        for def in defs {
            let key = def.key.clone();
            if self.sources.contains_key(&key) {
                let registered = self.load_registered(&key)?;
                if registered != def {
                    return Err(BranchDiffError::ConflictingDefinition {
                        asset_key: key.to_string(),
                    });
                }
            } else if let Some(existing) = self.cache.get(&key) {
                if existing != &def {
                    return Err(BranchDiffError::ConflictingDefinition {
                        asset_key: key.to_string(),
                    });
                }
            } else {
                self.cache.insert(key.clone(), def);
            }
            keys.push(key);
        }

        self.discovered = Some(keys.clone());
        Ok(keys)
    }

    /// Load (or fetch from cache) a registered definition, validating its key.
    fn load_registered(&mut self, key: &AssetKey) -> Result<AssetDefinitionSnapshot> {
        if let Some(def) = self.cache.get(key) {
            return Ok(def.clone());
        }
        let def = match self.sources.get(key) {
            Some(DefinitionSource::Eager(def)) => def.clone(),
            Some(DefinitionSource::Deferred(loader)) => loader(),
            None => {
                return Err(BranchDiffError::Internal {
                    message: format!("no registered source for asset {}", key),
                })
            }
        };
        if &def.key != key {
            return Err(BranchDiffError::DefinitionKeyMismatch {
                expected: key.to_string(),
                actual: def.key.to_string(),
            });
        }
        self.cache.insert(key.clone(), def.clone());
        Ok(def)
    }

    /// All known keys: registered keys first (ascending), then keys found only
    /// by discovery, in discovery order.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from the discovery pass.
    pub fn definition_names(&mut self) -> Result<Vec<AssetKey>> {
        if let Some(names) = &self.names {
            return Ok(names.clone());
        }
        let discovered = self.discover()?;
        let mut names: Vec<AssetKey> = self.sources.keys().cloned().collect();
        for key in discovered {
            if !self.sources.contains_key(&key) && !names.contains(&key) {
                names.push(key);
            }
        }
        self.names = Some(names.clone());
        Ok(names)
    }

    /// # Errors
    ///
    /// Propagates validation failures from the discovery pass.
    pub fn has_definition(&mut self, key: &AssetKey) -> Result<bool> {
        Ok(self.definition_names()?.contains(key))
    }

    /// Fetch one definition, loading and caching it if needed
    ///
    /// # Errors
    ///
    /// - `DefinitionNotFound` listing every known key, if `key` is unknown
    /// - `DefinitionKeyMismatch` if a loader returned another asset
    pub fn get_definition(&mut self, key: &AssetKey) -> Result<AssetDefinitionSnapshot> {
        if !self.has_definition(key)? {
            let known = self
                .definition_names()?
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(BranchDiffError::DefinitionNotFound {
                asset_key: key.to_string(),
                known,
            });
        }
        if self.sources.contains_key(key) {
            return self.load_registered(key);
        }
        self.cache
            .get(key)
            .cloned()
            .ok_or_else(|| BranchDiffError::Internal {
                message: format!("discovered asset {} missing from cache", key),
            })
    }

    /// Every definition, sorted by key
    ///
    /// # Errors
    ///
    /// Propagates loading and validation failures.
    pub fn all_definitions(&mut self) -> Result<Vec<AssetDefinitionSnapshot>> {
        let mut names = self.definition_names()?;
        names.sort();
        names.iter().map(|key| self.get_definition(key)).collect()
    }

    /// Load everything and freeze it into an immutable snapshot
    ///
    /// # Errors
    ///
    /// Propagates loading and validation failures.
    pub fn build_snapshot(&mut self) -> Result<AssetGraphSnapshot> {
        let defs = self.all_definitions()?;
        AssetGraphSnapshot::from_definitions(self.deployment.clone(), defs)
    }

    /// Number of definitions loaded so far
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
