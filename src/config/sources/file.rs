//! TOML file sources

use crate::config::CONFIG_FILE_NAME;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// `adk.toml` in `dir`, skipped when absent.
pub fn add_optional(builder: ConfigBuilder<DefaultState>, dir: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(dir.join(CONFIG_FILE_NAME))
            .format(FileFormat::Toml)
            .required(false),
    )
}

/// A specific TOML file that must exist.
pub fn add_required(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).format(FileFormat::Toml).required(true))
}
