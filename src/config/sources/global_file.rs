//! Global config file: $XDG_CONFIG_HOME/edfs/config.toml (optional).

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::{Path, PathBuf};

/// Location of the global config file, if a config home can be determined.
pub fn default_path() -> Option<PathBuf> {
    xdg::config_home()
        .ok()
        .map(|home| home.join("edfs").join("config.toml"))
}

/// Add the global file layer. A missing file is skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(path.to_path_buf())
            .format(FileFormat::Toml)
            .required(false),
    )
}
