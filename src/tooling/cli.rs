//! CLI Tooling
//!
//! Command-line surface `edfs <command> <path>` and the dispatcher that runs
//! one command per invocation. Command failures are reported as text and
//! never change the process exit status; only a malformed invocation does.

use crate::commands::{Command, CommandEngine};
use crate::config::EdfsConfig;
use crate::error::ApiError;
use crate::store::{RestTreeStore, TreeStore};
use clap::Parser;
use tracing::{info, warn};

/// EDFS - HDFS-style filesystem emulator over a JSON document store
#[derive(Parser, Debug)]
#[command(name = "edfs")]
#[command(about = "HDFS-style filesystem emulator backed by a remote JSON document store")]
#[command(override_usage = "edfs <COMMAND> <PATH>")]
pub struct Cli {
    /// Command: -ls, -mkdir, -rmdir, -create, -rm, -export
    #[arg(value_name = "COMMAND", allow_hyphen_values = true)]
    pub command: String,

    /// Absolute filesystem path (output file name for -export)
    #[arg(value_name = "PATH", allow_hyphen_values = true)]
    pub path: String,
}

/// Dispatcher holding the command engine for one invocation.
pub struct CliContext<S: TreeStore = RestTreeStore> {
    engine: CommandEngine<S>,
}

impl CliContext {
    /// Connect to the remote store named by configuration.
    pub fn new(config: &EdfsConfig) -> Result<Self, ApiError> {
        let store = RestTreeStore::new(&config.store)?;
        info!(base_url = %config.store.base_url, "opened tree store");
        Ok(Self::with_store(store))
    }
}

impl<S: TreeStore> CliContext<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            engine: CommandEngine::new(store),
        }
    }

    /// Run the parsed invocation.
    pub fn run(&self, cli: &Cli) -> String {
        self.execute(&cli.command, &cli.path)
    }

    /// Parse and run one command, returning the text to print.
    pub fn execute(&self, flag: &str, argument: &str) -> String {
        let command = match Command::parse(flag, argument) {
            Ok(command) => command,
            Err(unknown) => {
                warn!(command = flag, "unknown command");
                return unknown.to_string();
            }
        };

        match self.engine.execute(&command) {
            Ok(outcome) => {
                info!(command = %command, mutated = outcome.mutated, "command succeeded");
                outcome.message
            }
            Err(err) if err.is_benign() => {
                info!(command = %command, "{}", err);
                err.to_string()
            }
            Err(err) => {
                warn!(command = %command, error = %err, "command failed");
                err.to_string()
            }
        }
    }
}
