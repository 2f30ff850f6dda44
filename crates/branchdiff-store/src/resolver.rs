//! Deployment-to-snapshot resolution.
//!
//! A branch diff names two deployments: a base (by default `prod`) and a
//! branch. A [`SnapshotResolver`] turns each name into its
//! `AssetGraphSnapshot`; [`resolve_pair`] fetches both and hands back a
//! [`SnapshotPair`] ready to diff.

#![allow(clippy::result_large_err)]

use crate::errors::{invalid_deployment, snapshot_not_found, snapshot_validation, Result};
use crate::snapshot::parse_snapshot_file;
use branchdiff_core::diff::{compute_graph_diff, GraphDiff};
use branchdiff_core::errors::{ExError, ExErrorKind};
use branchdiff_core::snapshot::AssetGraphSnapshot;
use branchdiff_core::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Base deployment used when none is configured
pub const DEFAULT_BASE_DEPLOYMENT: &str = "prod";

/// File extensions probed by [`DirectorySnapshotResolver`], in order
pub const SNAPSHOT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Source of deployment snapshots
pub trait SnapshotResolver {
    /// Resolve a deployment name to its snapshot
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` when the deployment is unknown; other kinds when
    /// the snapshot exists but cannot be loaded.
    fn resolve(&self, deployment: &str) -> Result<AssetGraphSnapshot>;
}

/// Resolves `<dir>/<deployment>.{yaml,yml,json}`
#[derive(Debug, Clone)]
pub struct DirectorySnapshotResolver {
    dir: PathBuf,
}

impl DirectorySnapshotResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the first existing snapshot file for `deployment`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the name is empty or contains a path separator
    /// - `SnapshotNotFound` listing every candidate path otherwise
    pub fn locate(&self, deployment: &str) -> Result<PathBuf> {
        validate_deployment_name(deployment)?;
        let candidates: Vec<PathBuf> = SNAPSHOT_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", deployment, ext)))
            .collect();
        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| snapshot_not_found(deployment, &candidates))
    }
}

impl SnapshotResolver for DirectorySnapshotResolver {
    fn resolve(&self, deployment: &str) -> Result<AssetGraphSnapshot> {
        let started = Instant::now();
        log_op_start!(
            "resolve_snapshot",
            deployment = deployment,
            dir = %self.dir.display()
        );

        let result = self.locate(deployment).and_then(|path| {
            let snapshot = parse_snapshot_file(&path)?;
            if snapshot.deployment() != deployment {
                return Err(snapshot_validation(&format!(
                    "{} declares deployment '{}', expected '{}'",
                    path.display(),
                    snapshot.deployment(),
                    deployment
                ))
                .with_deployment(deployment));
            }
            Ok(snapshot)
        });

        match &result {
            Ok(snapshot) => log_op_end!(
                "resolve_snapshot",
                duration_ms = started.elapsed().as_millis() as u64,
                deployment = deployment,
                asset_count = snapshot.len()
            ),
            Err(err) => log_op_error!(
                "resolve_snapshot",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64,
                deployment = deployment
            ),
        }
        result
    }
}

/// Resolver over snapshots held in memory, keyed by their deployment
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotResolver {
    snapshots: BTreeMap<String, AssetGraphSnapshot>,
}

impl InMemorySnapshotResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the snapshot for its deployment
    pub fn insert(&mut self, snapshot: AssetGraphSnapshot) {
        self.snapshots
            .insert(snapshot.deployment().to_string(), snapshot);
    }

    pub fn with_snapshot(mut self, snapshot: AssetGraphSnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    pub fn deployments(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }
}

impl SnapshotResolver for InMemorySnapshotResolver {
    fn resolve(&self, deployment: &str) -> Result<AssetGraphSnapshot> {
        self.snapshots.get(deployment).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::SnapshotNotFound)
                .with_op("resolve_snapshot")
                .with_deployment(deployment)
                .with_message(format!("No snapshot for deployment '{}'", deployment))
                .with_candidates(self.deployments().map(str::to_string).collect())
        })
    }
}

/// Base and branch snapshots resolved together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    pub base: AssetGraphSnapshot,
    pub branch: AssetGraphSnapshot,
}

impl SnapshotPair {
    pub fn diff(&self) -> GraphDiff {
        compute_graph_diff(&self.base, &self.branch)
    }
}

/// Resolve the base and branch deployments through one resolver
///
/// # Errors
///
/// Propagates the first resolution failure, base first.
pub fn resolve_pair<R>(resolver: &R, base: &str, branch: &str) -> Result<SnapshotPair>
where
    R: SnapshotResolver + ?Sized,
{
    let base = resolver.resolve(base)?;
    let branch = resolver.resolve(branch)?;
    Ok(SnapshotPair { base, branch })
}

fn validate_deployment_name(deployment: &str) -> Result<()> {
    if deployment.trim().is_empty() {
        return Err(invalid_deployment(deployment, "name is empty"));
    }
    if deployment.contains(['/', '\\']) || deployment == "." || deployment == ".." {
        return Err(invalid_deployment(
            deployment,
            "name must not contain path components",
        ));
    }
    Ok(())
}
