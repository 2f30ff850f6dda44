//! Digest computation for asset definitions and graph snapshots.
//!
//! ## Digest Types
//!
//! - **Definition digest**: hash of one definition's canonical JSON
//! - **Snapshot digest**: hash of all definitions in key order; the
//!   deployment name is excluded, so two deployments declaring the same
//!   graph share a digest
//!
//! Canonical JSON relies on ordered collections throughout the model
//! (`BTreeMap`/`BTreeSet`), so the same definitions always serialize to the
//! same bytes.

use crate::errors::Result;
use crate::model::AssetDefinitionSnapshot;
use crate::snapshot::graph::AssetGraphSnapshot;
use sha2::{Digest, Sha256};

/// Compute the digest of a single definition.
///
/// Hex-encoded SHA256 (64 characters).
///
/// # Errors
///
/// Returns `BranchDiffError::Serialization` if JSON serialization fails.
pub fn compute_definition_digest(def: &AssetDefinitionSnapshot) -> Result<String> {
    let canonical = serde_json::to_vec(def)?;
    Ok(hash_bytes(&canonical))
}

/// Compute the digest of a whole snapshot, independent of its deployment name.
///
/// # Errors
///
/// Returns `BranchDiffError::Serialization` if JSON serialization fails.
///
/// ```
/// use branchdiff_core::snapshot::{compute_snapshot_digest, AssetGraphSnapshot};
///
/// let a = AssetGraphSnapshot::empty("prod");
/// let b = AssetGraphSnapshot::empty("pr-1");
/// assert_eq!(
///     compute_snapshot_digest(&a).unwrap(),
///     compute_snapshot_digest(&b).unwrap()
/// );
/// ```
pub fn compute_snapshot_digest(snapshot: &AssetGraphSnapshot) -> Result<String> {
    let mut hasher = Sha256::new();
    for def in snapshot.definitions() {
        hasher.update(serde_json::to_vec(def)?);
        hasher.update(b"\n");
    }
    Ok(hex::encode(hasher.finalize()))
}

fn hash_bytes(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}
