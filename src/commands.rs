//! Command Engine
//!
//! The six filesystem commands. Each is a one-shot sequence of fresh reads
//! against the store, invariant checks, and at most one mutating request.
//! Nothing is cached between commands: the store is the only state.
//!
//! Check-then-act sequences are not atomic. Two emulator processes racing on
//! the same path can both pass an existence check and both write.

use crate::error::{FsError, Precondition};
use crate::paths::{has_export_extension, ResolvedPath, EXPORT_EXTENSION, ROOT};
use crate::store::TreeStore;
use crate::tree::export::{render_xml, write_atomically};
use crate::tree::{Node, TreeView};
use crate::types::NodeKind;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// A parsed command with its single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls { path: String },
    Mkdir { path: String },
    Rmdir { path: String },
    Create { path: String },
    Rm { path: String },
    Export { output: String },
}

/// Command flag not in the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Command not found: {command}. Available commands: {}", Command::available())]
pub struct UnknownCommand {
    pub command: String,
}

impl Command {
    /// Flags accepted on the command line, in help order.
    pub const FLAGS: [&'static str; 6] = ["-ls", "-mkdir", "-rmdir", "-create", "-rm", "-export"];

    pub fn parse(flag: &str, argument: &str) -> Result<Self, UnknownCommand> {
        let argument = argument.to_string();
        match flag {
            "-ls" => Ok(Command::Ls { path: argument }),
            "-mkdir" => Ok(Command::Mkdir { path: argument }),
            "-rmdir" => Ok(Command::Rmdir { path: argument }),
            "-create" => Ok(Command::Create { path: argument }),
            "-rm" => Ok(Command::Rm { path: argument }),
            "-export" => Ok(Command::Export { output: argument }),
            other => Err(UnknownCommand {
                command: other.to_string(),
            }),
        }
    }

    pub fn available() -> String {
        Self::FLAGS.join(", ")
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Command::Ls { .. } => "-ls",
            Command::Mkdir { .. } => "-mkdir",
            Command::Rmdir { .. } => "-rmdir",
            Command::Create { .. } => "-create",
            Command::Rm { .. } => "-rm",
            Command::Export { .. } => "-export",
        }
    }

    pub fn argument(&self) -> &str {
        match self {
            Command::Ls { path }
            | Command::Mkdir { path }
            | Command::Rmdir { path }
            | Command::Create { path }
            | Command::Rm { path } => path,
            Command::Export { output } => output,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.flag(), self.argument())
    }
}

/// Successful result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Text reported to the user.
    pub message: String,
    /// True if the store (or the export target) was written.
    pub mutated: bool,
}

impl CommandOutcome {
    fn changed(message: String) -> Self {
        Self {
            message,
            mutated: true,
        }
    }

    fn unchanged(message: String) -> Self {
        Self {
            message,
            mutated: false,
        }
    }
}

/// Runs commands against a tree store.
pub struct CommandEngine<S: TreeStore> {
    store: S,
}

impl<S: TreeStore> CommandEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn view(&self) -> TreeView<'_, S> {
        TreeView::new(&self.store)
    }

    pub fn execute(&self, command: &Command) -> Result<CommandOutcome, FsError> {
        debug!(command = %command, "executing command");
        match command {
            Command::Ls { path } => self.ls(path),
            Command::Mkdir { path } => self.mkdir(path),
            Command::Rmdir { path } => self.rmdir(path),
            Command::Create { path } => self.create(path),
            Command::Rm { path } => self.rm(path),
            Command::Export { output } => self.export(output),
        }
    }

    /// Tab-separated listing of a directory's immediate children. Listing a
    /// file prints the file's own name.
    pub fn ls(&self, raw: &str) -> Result<CommandOutcome, FsError> {
        let resolved = if raw == ROOT {
            ResolvedPath::root()
        } else {
            ResolvedPath::lookup(raw)?
        };
        let view = self.view();
        // `/a/f.txt` addresses key `a/f`; a directory stored there is not that file.
        if resolved.kind() == NodeKind::File && view.is_directory(resolved.key())? {
            return Err(FsError::not_found(raw, None));
        }
        let names = view
            .list_immediate_children(resolved.key())?
            .ok_or_else(|| FsError::not_found(raw, None))?;
        Ok(CommandOutcome::unchanged(names.join("\t")))
    }

    /// Create a directory. Creating over an existing node is reported as
    /// "already exists" and leaves the store unchanged. The parent must exist.
    pub fn mkdir(&self, raw: &str) -> Result<CommandOutcome, FsError> {
        let resolved = ResolvedPath::directory(raw)?;
        if resolved.is_root() || self.view().exists(resolved.key())? {
            return Err(FsError::AlreadyExists {
                path: raw.to_string(),
                kind: NodeKind::Directory,
            });
        }
        self.require_parent_directory(&resolved)?;

        let node = Node::new_directory(resolved.name());
        self.store.write(resolved.key(), &node.to_document())?;
        info!(path = raw, id = %node.id, "created directory");
        Ok(CommandOutcome::changed(format!(
            "Successfully created directory: {}",
            raw
        )))
    }

    /// Remove an empty directory. Absent paths are NotFound, not empty.
    pub fn rmdir(&self, raw: &str) -> Result<CommandOutcome, FsError> {
        let resolved = ResolvedPath::directory(raw)?;
        if resolved.is_root() {
            return Err(FsError::invalid(raw, "cannot remove the root directory"));
        }
        let view = self.view();
        if !view.is_empty_directory(resolved.key())? {
            return Err(match view.fetch_node(resolved.key())? {
                None => FsError::not_found(raw, None),
                Some(fetched) if !fetched.is_directory() => FsError::invalid(raw, "not a directory"),
                Some(_) => FsError::precondition(raw, Precondition::DirectoryNotEmpty),
            });
        }

        self.store.remove(resolved.key())?;
        info!(path = raw, "deleted directory");
        Ok(CommandOutcome::changed(format!(
            "Successfully deleted directory: {}",
            raw
        )))
    }

    /// Create a file with placeholder content under an existing directory.
    pub fn create(&self, raw: &str) -> Result<CommandOutcome, FsError> {
        let resolved = ResolvedPath::file(raw)?;
        self.require_parent_directory(&resolved)?;
        if self.view().exists(resolved.key())? {
            return Err(FsError::AlreadyExists {
                path: raw.to_string(),
                kind: NodeKind::File,
            });
        }

        let node = Node::new_file(resolved.name());
        self.store.write(resolved.key(), &node.to_document())?;
        info!(path = raw, key = %resolved.key(), id = %node.id, "created file");
        Ok(CommandOutcome::changed(format!(
            "Successfully created file: {}",
            raw
        )))
    }

    /// Delete a file at its suffix-stripped key.
    pub fn rm(&self, raw: &str) -> Result<CommandOutcome, FsError> {
        let resolved = ResolvedPath::file(raw)?;
        let fetched = self
            .view()
            .fetch_node(resolved.key())?
            .ok_or_else(|| FsError::not_found(raw, Some(NodeKind::File)))?;
        if fetched.is_directory() {
            return Err(FsError::invalid(raw, "not a file"));
        }

        self.store.remove(resolved.key())?;
        info!(path = raw, key = %resolved.key(), "deleted file");
        Ok(CommandOutcome::changed(format!(
            "Successfully deleted file: {}",
            raw
        )))
    }

    /// Render the whole tree as XML and write it to `output`.
    pub fn export(&self, output: &str) -> Result<CommandOutcome, FsError> {
        if !has_export_extension(output) {
            return Err(FsError::invalid(
                output,
                format!("export target must end in {}", EXPORT_EXTENSION),
            ));
        }
        let tree = self
            .view()
            .flatten_subtree(ResolvedPath::root().key())?
            .ok_or_else(|| FsError::not_found(ROOT, None))?;
        let rendering = render_xml(&tree);

        write_atomically(Path::new(output), &rendering).map_err(|source| FsError::Export {
            path: output.to_string(),
            source,
        })?;
        info!(output, bytes = rendering.len(), "exported tree");
        Ok(CommandOutcome::changed(format!(
            "Successfully exported file system to: {}",
            output
        )))
    }

    fn require_parent_directory(&self, resolved: &ResolvedPath) -> Result<(), FsError> {
        let parent = resolved.parent();
        match self.view().fetch_node(parent.key())? {
            None => Err(FsError::precondition(
                resolved.path(),
                Precondition::MissingParent,
            )),
            Some(fetched) if !fetched.is_directory() => Err(FsError::precondition(
                resolved.path(),
                Precondition::ParentNotDirectory,
            )),
            Some(_) => Ok(()),
        }
    }
}
