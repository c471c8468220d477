//! Config file named by EDFS_CONFIG.

use crate::config::CONFIG_FILE_ENV;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};

/// Path from `EDFS_CONFIG`, if set and non-empty.
pub fn path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Add an explicitly named file. It must exist; format follows the extension.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(format!(
            "config file {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::from(path.to_path_buf()).required(true)))
}
