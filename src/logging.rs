//! Logging
//!
//! `tracing` subscriber setup. Command output goes to stdout, so log lines
//! default to stderr at `warn`. Each setting can be overridden from the
//! environment: `EDFS_LOG` (filter directives), `EDFS_LOG_FORMAT`,
//! `EDFS_LOG_OUTPUT` and `EDFS_LOG_FILE`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const FILTER_ENV: &str = "EDFS_LOG";
const FORMAT_ENV: &str = "EDFS_LOG_FORMAT";
const OUTPUT_ENV: &str = "EDFS_LOG_OUTPUT";
const FILE_ENV: &str = "EDFS_LOG_FILE";

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                other
            ))),
        }
    }
}

/// `[logging]` table of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Default level: trace, debug, info, warn, error or off.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default = "default_format")]
    pub format: LogFormat,

    #[serde(default = "default_output")]
    pub output: LogOutput,

    /// Log file for the file outputs; unset uses the platform state directory.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream.
    #[serde(default = "enabled_by_default")]
    pub color: bool,

    /// Per-target levels, e.g. `"edfs::store" = "debug"`.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn enabled_by_default() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> LogFormat {
    LogFormat::Text
}

fn default_output() -> LogOutput {
    LogOutput::Stderr
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: enabled_by_default(),
            level: default_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: enabled_by_default(),
            modules: BTreeMap::new(),
        }
    }
}

/// Install the global subscriber described by `config`, with environment
/// overrides applied on top.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(install_error);
    }

    let filter = env_filter(config)?;
    let format = env_override::<LogFormat>(FORMAT_ENV)?.unwrap_or(config.format);
    let output = env_override::<LogOutput>(OUTPUT_ENV)?.unwrap_or(config.output);
    let ansi = config.color && !output.writes_file();
    let writer = make_writer(output, config.file.clone())?;

    let registry = Registry::default().with(filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let installed = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
    };
    installed.map_err(install_error)
}

fn install_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::ConfigError(format!("Failed to install logger: {}", err))
}

/// Parse `var` when it is set and non-empty.
fn env_override<T: FromStr<Err = ApiError>>(var: &str) -> Result<Option<T>, ApiError> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(FILTER_ENV) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    let mut filter = EnvFilter::new(&config.level);
    for (target, level) in &config.modules {
        let directive: Directive = format!("{}={}", target, level)
            .parse()
            .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn make_writer(output: LogOutput, file: Option<PathBuf>) -> Result<BoxMakeWriter, ApiError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File => BoxMakeWriter::new(open_log_file(file)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(file)?.and(std::io::stderr))
        }
    };
    Ok(writer)
}

/// Log file location: `EDFS_LOG_FILE`, then the configured path, then
/// `edfs.log` in the platform state directory.
pub fn resolve_log_file_path(configured: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    let from_env = std::env::var(FILE_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    if let Some(path) = from_env.or(configured.filter(|p| !p.as_os_str().is_empty())) {
        return Ok(path);
    }

    let dirs = directories::ProjectDirs::from("", "edfs", "edfs").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(dir.join("edfs.log"))
}

fn open_log_file(configured: Option<PathBuf>) -> Result<Arc<File>, ApiError> {
    let path = resolve_log_file_path(configured)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })?;
    Ok(Arc::new(file))
}
