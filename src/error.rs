//! Error types for the filesystem emulator.
//!
//! `StoreError` covers the remote document store boundary, `FsError` is the
//! command-level taxonomy (its `Display` is the user-facing message), and
//! `ApiError` covers process setup (configuration, logging, client wiring).

use crate::types::NodeKind;
use thiserror::Error;

/// Failures talking to the backing document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("malformed store document at '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
}

/// Why a command's precondition did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    DirectoryNotEmpty,
    MissingParent,
    ParentNotDirectory,
}

/// Command-level errors. Displayed verbatim to the user.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Invalid path: {path} ({reason})")]
    InvalidInput { path: String, reason: String },

    #[error("{}", not_found_message(path, *expected))]
    NotFound {
        path: String,
        expected: Option<NodeKind>,
    },

    #[error("{} already exists: {path}", kind_label(*kind))]
    AlreadyExists { path: String, kind: NodeKind },

    #[error("{}", precondition_message(path, *reason))]
    PreconditionFailed { path: String, reason: Precondition },

    #[error("Error: {0}")]
    Transport(#[from] StoreError),

    #[error("Error: failed to write export to {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub fn invalid(path: &str, reason: impl Into<String>) -> Self {
        FsError::InvalidInput {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(path: &str, expected: Option<NodeKind>) -> Self {
        FsError::NotFound {
            path: path.to_string(),
            expected,
        }
    }

    pub fn precondition(path: &str, reason: Precondition) -> Self {
        FsError::PreconditionFailed {
            path: path.to_string(),
            reason,
        }
    }

    /// AlreadyExists is reported but leaves the store unchanged; it is not a failure.
    pub fn is_benign(&self) -> bool {
        matches!(self, FsError::AlreadyExists { .. })
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Directory => "Directory",
        NodeKind::File => "File",
    }
}

fn not_found_message(path: &str, expected: Option<NodeKind>) -> String {
    match expected {
        Some(NodeKind::File) => format!("File does not exist: {}", path),
        _ => format!("Invalid path: {}", path),
    }
}

fn precondition_message(path: &str, reason: Precondition) -> String {
    match reason {
        Precondition::DirectoryNotEmpty => format!("Directory is not empty: {}", path),
        Precondition::MissingParent => {
            format!("Invalid path: {} (parent directory does not exist)", path)
        }
        Precondition::ParentNotDirectory => {
            format!("Invalid path: {} (parent is not a directory)", path)
        }
    }
}

/// Process-level errors raised before any command runs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
