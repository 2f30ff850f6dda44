//! Label projection for graph UIs.
//!
//! Rendering is owned by the UI; this module fixes the contract it renders
//! from: which label an asset gets and which assets survive a "changed
//! only" filter.

use crate::diff::model::{ChangeReason, GraphDiff};
use crate::model::AssetKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Badge shown next to an asset node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeLabel {
    NewInBranch,
    ChangedInBranch,
    RemovedInBranch,
}

impl ChangeLabel {
    /// Label for a branch asset's reason set; `None` when unchanged
    pub fn for_reasons(reasons: &BTreeSet<ChangeReason>) -> Option<ChangeLabel> {
        if reasons.is_empty() {
            None
        } else if reasons.contains(&ChangeReason::New) {
            Some(ChangeLabel::NewInBranch)
        } else {
            Some(ChangeLabel::ChangedInBranch)
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            ChangeLabel::NewInBranch => "New in branch",
            ChangeLabel::ChangedInBranch => "Changed in branch",
            ChangeLabel::RemovedInBranch => "Removed in branch",
        }
    }
}

impl fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One row of the projected label list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLabel {
    pub key: AssetKey,
    pub label: Option<ChangeLabel>,
    pub reasons: BTreeSet<ChangeReason>,
}

impl GraphDiff {
    /// Label for any key seen by the diff; `None` for unchanged or unknown keys
    pub fn label(&self, key: &AssetKey) -> Option<ChangeLabel> {
        if self.removed_keys.contains(key) {
            return Some(ChangeLabel::RemovedInBranch);
        }
        self.changes.get(key).and_then(ChangeLabel::for_reasons)
    }
}

/// Project the diff into label rows, in key order.
///
/// With `changed_only`, rows for unchanged assets are dropped, leaving
/// exactly the keys for which [`GraphDiff::has_any_change`] holds.
pub fn project_labels(diff: &GraphDiff, changed_only: bool) -> Vec<AssetLabel> {
    let mut keys: BTreeSet<&AssetKey> = diff.changes.keys().collect();
    keys.extend(diff.removed_keys.iter());

    keys.into_iter()
        .filter(|key| !changed_only || diff.has_any_change(key))
        .map(|key| AssetLabel {
            key: key.clone(),
            label: diff.label(key),
            reasons: diff.reasons(key).cloned().unwrap_or_default(),
        })
        .collect()
}
