//! Shared helpers for integration tests.

use edfs::tooling::CliContext;
use edfs::MemoryTreeStore;

/// Run a sequence of `(flag, argument)` invocations against `store`,
/// each through a fresh dispatcher as separate processes would.
pub fn run_all(store: &MemoryTreeStore, invocations: &[(&str, &str)]) -> Vec<String> {
    invocations
        .iter()
        .map(|(flag, argument)| CliContext::with_store(store).execute(flag, argument))
        .collect()
}

/// Run one invocation against `store`.
pub fn run(store: &MemoryTreeStore, flag: &str, argument: &str) -> String {
    CliContext::with_store(store).execute(flag, argument)
}
