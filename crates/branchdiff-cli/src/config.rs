//! CLI settings
//!
//! Precedence, highest first: command-line flag, environment variable (both
//! resolved by clap), `branchdiff.toml`, built-in default.

use branchdiff_core::logging_facility::Profile;
use branchdiff_store::DEFAULT_BASE_DEPLOYMENT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "branchdiff.toml";

/// Contents of `branchdiff.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_deployment: Option<String>,
    pub snapshots_dir: Option<PathBuf>,
    pub log_profile: Option<String>,
}

impl FileConfig {
    /// Load an explicit config file, or `./branchdiff.toml` if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.is_file() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("Invalid config {}: {}", path.display(), e).into())
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Effective settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_deployment: String,
    pub snapshots_dir: Option<PathBuf>,
    pub log_profile: Profile,
}

impl Settings {
    /// File values over defaults
    pub fn from_file(file: FileConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let log_profile = match file.log_profile {
            Some(name) => name.parse::<Profile>()?,
            None => Profile::Development,
        };
        Ok(Self {
            base_deployment: file
                .base_deployment
                .unwrap_or_else(|| DEFAULT_BASE_DEPLOYMENT.to_string()),
            snapshots_dir: file.snapshots_dir,
            log_profile,
        })
    }

    pub fn with_log_profile(
        mut self,
        profile: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(name) = profile {
            self.log_profile = name.parse::<Profile>()?;
        }
        Ok(self)
    }

    pub fn with_base_deployment(mut self, base: Option<String>) -> Self {
        if let Some(base) = base {
            self.base_deployment = base;
        }
        self
    }

    pub fn with_snapshots_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.snapshots_dir = dir;
        }
        self
    }
}
