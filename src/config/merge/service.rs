//! MergeService: orchestrates sources, applies merge policy, deserializes to EdfsConfig.

use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::EdfsConfig;
use config::{ConfigError, Environment};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> EDFS_CONFIG file -> environment (highest).
    pub fn load() -> Result<EdfsConfig, ConfigError> {
        let explicit = explicit_file::path_from_env();
        let global = global_file::default_path();
        Self::load_layers(global.as_deref(), explicit.as_deref(), environment::source())
    }

    /// Compose the given layers. The global file is optional; the explicit
    /// file must exist when named.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env: Environment,
    ) -> Result<EdfsConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = match global {
            Some(path) => global_file::add_to_builder(builder, path),
            None => builder,
        };
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = builder.add_source(env);

        let config = builder.build()?;
        config.try_deserialize()
    }
}
