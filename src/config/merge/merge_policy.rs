//! Defaults layer every merge starts from.

use crate::config::DEFAULT_BASE_URL;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with built-in defaults (lowest precedence).
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("store.base_url", DEFAULT_BASE_URL)
}
