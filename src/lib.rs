//! EDFS: an HDFS-style filesystem emulator
//!
//! Keeps a directory/file tree inside a remote JSON document store whose
//! endpoints mirror filesystem paths, and exposes `ls`, `mkdir`, `rmdir`,
//! `create`, `rm` and `export` over it. Filesystem invariants (unique paths,
//! parents before children, only empty directories removable) are enforced
//! with plain fetch/write/remove requests against the store.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use commands::{Command, CommandEngine, CommandOutcome};
pub use error::{ApiError, FsError, StoreError};
pub use store::{MemoryTreeStore, RestTreeStore, TreeStore};
