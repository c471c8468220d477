//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::EdfsConfig;
use config::ConfigError;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, `EDFS_CONFIG` and environment.
    pub fn load() -> Result<EdfsConfig, ConfigError> {
        MergeService::load()
    }
}
