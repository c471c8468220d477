//! Output and store-state contracts for the filesystem commands.

mod support;

use edfs::paths::StoreKey;
use edfs::tooling::CliContext;
use edfs::{MemoryTreeStore, StoreError, TreeStore};
use serde_json::{json, Value};
use support::{run, run_all};
use tempfile::TempDir;

/// Reads pass through to `inner`; writes and removes fail as an
/// unavailable store would. With `reads_fail`, fetches fail too.
struct UnavailableStore<'a> {
    inner: &'a MemoryTreeStore,
    reads_fail: bool,
}

fn unavailable(key: &StoreKey) -> StoreError {
    StoreError::Status {
        url: format!("http://store.test{}.json", key),
        status: 503,
    }
}

impl TreeStore for UnavailableStore<'_> {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        if self.reads_fail {
            return Err(unavailable(key));
        }
        self.inner.fetch(key)
    }

    fn write(&self, key: &StoreKey, _document: &Value) -> Result<(), StoreError> {
        Err(unavailable(key))
    }

    fn remove(&self, key: &StoreKey) -> Result<(), StoreError> {
        Err(unavailable(key))
    }
}

#[test]
fn user_directory_lifecycle_messages() {
    let store = MemoryTreeStore::new();
    let outputs = run_all(
        &store,
        &[
            ("-mkdir", "/users"),
            ("-mkdir", "/users"),
            ("-create", "/users/a.txt"),
            ("-rm", "/users/a.txt"),
            ("-rmdir", "/users"),
        ],
    );
    assert_eq!(
        outputs,
        vec![
            "Successfully created directory: /users",
            "Directory already exists: /users",
            "Successfully created file: /users/a.txt",
            "Successfully deleted file: /users/a.txt",
            "Successfully deleted directory: /users",
        ]
    );
    assert_eq!(store.snapshot(), json!({}));
}

#[test]
fn repeated_mkdir_leaves_single_node() {
    let store = MemoryTreeStore::new();
    run(&store, "-mkdir", "/data");
    let id_before = store.snapshot()["data"]["id"].clone();
    let writes_before = store.mutation_count();

    assert_eq!(run(&store, "-mkdir", "/data"), "Directory already exists: /data");
    assert_eq!(store.mutation_count(), writes_before);
    assert_eq!(store.snapshot()["data"]["id"], id_before);
    assert_eq!(run(&store, "-ls", "/"), "/data");
}

#[test]
fn created_directory_is_listed_by_parent() {
    let store = MemoryTreeStore::new();
    run_all(&store, &[("-mkdir", "/a"), ("-mkdir", "/a/b"), ("-mkdir", "/a/c")]);
    assert_eq!(run(&store, "-ls", "/a"), "/b\t/c");
}

#[test]
fn rmdir_refuses_non_empty_directory() {
    let store = MemoryTreeStore::new();
    run_all(&store, &[("-mkdir", "/a"), ("-mkdir", "/a/b")]);
    assert_eq!(run(&store, "-rmdir", "/a"), "Directory is not empty: /a");
    assert!(store.snapshot()["a"]["b"].is_object());

    assert_eq!(run(&store, "-rmdir", "/a/b"), "Successfully deleted directory: /a/b");
    assert_eq!(run(&store, "-rmdir", "/a"), "Successfully deleted directory: /a");
    assert_eq!(run(&store, "-ls", "/a"), "Invalid path: /a");
}

#[test]
fn rmdir_of_missing_path_is_invalid_not_empty() {
    let store = MemoryTreeStore::new();
    assert_eq!(run(&store, "-rmdir", "/ghost"), "Invalid path: /ghost");
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn create_without_parent_fails() {
    let store = MemoryTreeStore::new();
    assert_eq!(
        run(&store, "-create", "/nowhere/a.txt"),
        "Invalid path: /nowhere/a.txt (parent directory does not exist)"
    );
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn create_writes_exactly_one_file_node() {
    let store = MemoryTreeStore::new();
    run(&store, "-mkdir", "/docs");
    let writes_before = store.mutation_count();
    run(&store, "-create", "/docs/report.txt");
    assert_eq!(store.mutation_count(), writes_before + 1);

    let docs = store.snapshot()["docs"].clone();
    assert_eq!(docs["report"]["kind"], json!("FILE"));
    assert_eq!(docs["report"]["name"], json!("report.txt"));
    assert_eq!(run(&store, "-ls", "/docs"), "report.txt");
}

#[test]
fn rm_missing_file_reports_does_not_exist() {
    let store = MemoryTreeStore::new();
    run(&store, "-mkdir", "/docs");
    assert_eq!(
        run(&store, "-rm", "/docs/none.txt"),
        "File does not exist: /docs/none.txt"
    );
}

#[test]
fn relative_paths_are_rejected() {
    let store = MemoryTreeStore::new();
    for flag in ["-ls", "-mkdir", "-rmdir", "-create", "-rm"] {
        let output = run(&store, flag, "users");
        assert!(
            output.starts_with("Invalid path: users"),
            "{flag} gave: {output}"
        );
    }
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn unknown_command_performs_no_mutation() {
    let store = MemoryTreeStore::new();
    run(&store, "-mkdir", "/keep");
    let before = store.snapshot();
    let writes_before = store.mutation_count();

    let output = run(&store, "-touch", "/keep/x");
    assert_eq!(
        output,
        "Command not found: -touch. Available commands: -ls, -mkdir, -rmdir, -create, -rm, -export"
    );
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.mutation_count(), writes_before);
}

#[test]
fn export_renders_nested_tree_without_blank_lines() {
    let store = MemoryTreeStore::new();
    run_all(
        &store,
        &[("-mkdir", "/a"), ("-mkdir", "/a/b"), ("-create", "/a/f.txt")],
    );

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.xml");
    let target_str = target.to_str().unwrap();
    assert_eq!(
        run(&store, "-export", target_str),
        format!("Successfully exported file system to: {}", target_str)
    );

    let xml = std::fs::read_to_string(&target).unwrap();
    assert!(!xml.lines().any(|line| line.trim().is_empty()));
    let tags: Vec<&str> = xml.lines().map(str::trim).collect();
    assert_eq!(tags, vec!["<root>", "<a>", "<b>", "</b>", "<f/>", "</a>", "</root>"]);
}

#[test]
fn export_keeps_store_order() {
    let store = MemoryTreeStore::new();
    run_all(
        &store,
        &[("-mkdir", "/zeta"), ("-mkdir", "/alpha"), ("-create", "/m.txt")],
    );
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("tree.xml");
    run(&store, "-export", target.to_str().unwrap());

    let xml = std::fs::read_to_string(&target).unwrap();
    assert_eq!(
        xml,
        "<root>\n\t<zeta>\n\t</zeta>\n\t<alpha>\n\t</alpha>\n\t<m/>\n</root>\n"
    );
}

#[test]
fn export_rejects_wrong_extension() {
    let store = MemoryTreeStore::new();
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.json");
    let output = run(&store, "-export", target.to_str().unwrap());
    assert!(output.starts_with("Invalid path:"), "got: {output}");
    assert!(output.ends_with("(export target must end in .xml)"));
    assert!(!target.exists());
}

#[test]
fn store_failure_aborts_command_and_later_commands_still_run() {
    let store = MemoryTreeStore::new();
    let failing = CliContext::with_store(UnavailableStore {
        inner: &store,
        reads_fail: false,
    });

    assert_eq!(
        failing.execute("-mkdir", "/users"),
        "Error: store returned HTTP 503 for http://store.test/users.json"
    );
    assert_eq!(store.mutation_count(), 0);
    assert_eq!(store.snapshot(), json!({}));

    assert_eq!(run(&store, "-mkdir", "/users"), "Successfully created directory: /users");
    assert_eq!(
        failing.execute("-rmdir", "/users"),
        "Error: store returned HTTP 503 for http://store.test/users.json"
    );
    assert_eq!(run(&store, "-ls", "/"), "/users");
}

#[test]
fn unreadable_store_is_reported_for_every_command() {
    let store = MemoryTreeStore::new();
    let failing = CliContext::with_store(UnavailableStore {
        inner: &store,
        reads_fail: true,
    });
    for (flag, argument) in [
        ("-ls", "/"),
        ("-mkdir", "/a"),
        ("-rmdir", "/a"),
        ("-create", "/a.txt"),
        ("-rm", "/a.txt"),
    ] {
        let output = failing.execute(flag, argument);
        assert!(
            output.starts_with("Error: store returned HTTP 503"),
            "{flag} gave: {output}"
        );
    }
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn export_stops_when_store_is_unreadable() {
    let store = MemoryTreeStore::new();
    let failing = CliContext::with_store(UnavailableStore {
        inner: &store,
        reads_fail: true,
    });
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.xml");
    let output = failing.execute("-export", target.to_str().unwrap());
    assert_eq!(output, "Error: store returned HTTP 503 for http://store.test/.json");
    assert!(!target.exists());
}

#[test]
fn rmdir_keeps_directory_holding_stray_data() {
    let store = MemoryTreeStore::from_document(json!({
        "d": {"kind": "DIRECTORY", "name": "d", "id": "1", "payload": {"value": 1}}
    }));
    assert_eq!(run(&store, "-rmdir", "/d"), "Directory is not empty: /d");
    assert_eq!(store.snapshot()["d"]["payload"], json!({"value": 1}));
}
