//! Tooling & Integration Layer
//!
//! Command-line parsing and the per-invocation dispatcher.

pub mod cli;

pub use cli::{Cli, CliContext};
