//! MergeService: orchestrates sources, applies merge policy, deserializes to AdkConfig.

use crate::config::sources::{environment, file};
use crate::config::AdkConfig;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from a directory and the environment.
    /// Precedence: defaults (lowest) -> `adk.toml` -> environment (highest).
    ///
    /// `env` replaces the process environment when given.
    pub fn load(config_dir: &Path, env: Option<HashMap<String, String>>) -> Result<AdkConfig> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_optional(builder, config_dir);
        let builder = environment::add_to_builder(builder, env);

        let config: AdkConfig = builder.build()?.try_deserialize()?;
        debug!(dir = %config_dir.display(), "loaded agent configuration");
        Ok(config)
    }

    /// Load config from a specific file with environment overlay. The file
    /// must exist.
    pub fn load_from_file(path: &Path, env: Option<HashMap<String, String>>) -> Result<AdkConfig> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_required(builder, path);
        let builder = environment::add_to_builder(builder, env);

        let config: AdkConfig = builder.build()?.try_deserialize()?;
        debug!(file = %path.display(), "loaded agent configuration");
        Ok(config)
    }
}
