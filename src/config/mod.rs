//! Configuration
//!
//! Layered configuration loaded with the `config` crate. Precedence, lowest
//! to highest: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/edfs/config.toml`), the file named by `EDFS_CONFIG`,
//! then `EDFS_*` environment variables (`__` separates nested keys, e.g.
//! `EDFS_STORE__BASE_URL`).

pub mod facade;
pub mod merge;
pub mod sources;
pub mod xdg;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "EDFS_CONFIG";

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Remote document store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store; documents live at `<base_url>/<key>.json`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as the `auth` query parameter on every request.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            timeout_secs: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdfsConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
