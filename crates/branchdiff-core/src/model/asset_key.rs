use crate::errors::{BranchDiffError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator used in the display form of an asset key
pub const KEY_SEPARATOR: char = '/';

/// Ordered path segments uniquely identifying an asset within a graph
///
/// Equality and ordering are segment-wise, so `["a", "b"]` sorts before
/// `["a", "b", "c"]` and both differ from `["a/b"]`. Serialized as a list of
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetKey {
    segments: Vec<String>,
}

impl AssetKey {
    /// Build a key from raw segments without validation
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a key from segments, rejecting an empty key or empty segment
    ///
    /// # Errors
    ///
    /// Returns `InvalidAssetKey` if there are no segments or any segment is empty.
    pub fn try_from_segments(segments: Vec<String>) -> Result<Self> {
        let key = Self { segments };
        key.validate()?;
        Ok(key)
    }

    /// Parse the `/`-joined display form (`"analytics/orders"`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidAssetKey` for an empty string or a string containing an
    /// empty segment (`"a//b"`, `"/a"`).
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(BranchDiffError::InvalidAssetKey {
                input: input.to_string(),
                reason: "asset key is empty".to_string(),
            });
        }
        Self::try_from_segments(input.split(KEY_SEPARATOR).map(str::to_string).collect())
    }

    fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(BranchDiffError::InvalidAssetKey {
                input: String::new(),
                reason: "asset key has no segments".to_string(),
            });
        }
        if let Some(pos) = self.segments.iter().position(|s| s.is_empty()) {
            return Err(BranchDiffError::InvalidAssetKey {
                input: self.to_string(),
                reason: format!("segment {} is empty", pos),
            });
        }
        Ok(())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, the asset's short name
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", KEY_SEPARATOR)?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for AssetKey {
    type Err = BranchDiffError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for AssetKey {
    /// Single-segment key; use [`AssetKey::parse`] for the joined form
    fn from(segment: &str) -> Self {
        Self::new([segment])
    }
}
