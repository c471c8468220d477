//! Environment variable source: EDFS_ prefix with __ separator

use config::Environment;

/// Environment overlay. `EDFS_STORE__BASE_URL` sets `store.base_url`.
pub fn source() -> Environment {
    Environment::with_prefix("EDFS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
