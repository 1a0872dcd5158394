//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AdkConfig;
use crate::error::Result;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `adk.toml` from `config_dir` when present, then the environment.
    pub fn load(config_dir: &Path) -> Result<AdkConfig> {
        MergeService::load(config_dir, None)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<AdkConfig> {
        MergeService::load_from_file(path, None)
    }

    /// Create default configuration.
    pub fn default() -> AdkConfig {
        AdkConfig::default()
    }
}
