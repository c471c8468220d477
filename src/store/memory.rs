//! In-process document store with the same GET/PUT/DELETE-by-path semantics
//! as the remote store: writes create intermediate objects, empty objects do
//! not exist, and deleting the last key of an object removes the object.
//!
//! For library callers and tests. Its contents live only as long as the
//! value, so the CLI never uses it: each invocation is a fresh process.

use crate::error::StoreError;
use crate::paths::StoreKey;
use crate::store::{is_absent, present, TreeStore};
use parking_lot::RwLock;
use serde_json::{Map, Value};

#[derive(Default)]
struct State {
    root: Map<String, Value>,
    mutations: usize,
}

#[derive(Default)]
pub struct MemoryTreeStore {
    state: RwLock<State>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing root document.
    pub fn from_document(document: Value) -> Self {
        let root = match document {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            state: RwLock::new(State { root, mutations: 0 }),
        }
    }

    /// Copy of the whole root document.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.state.read().root.clone())
    }

    /// Number of write and remove calls served so far.
    pub fn mutation_count(&self) -> usize {
        self.state.read().mutations
    }
}

impl TreeStore for MemoryTreeStore {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        let state = self.state.read();
        let mut current = &state.root;
        let mut segments = key.segments().peekable();
        if segments.peek().is_none() {
            return Ok(present(Value::Object(current.clone())));
        }
        while let Some(segment) = segments.next() {
            match current.get(segment) {
                Some(Value::Object(map)) => current = map,
                Some(leaf) if segments.peek().is_none() => return Ok(present(leaf.clone())),
                _ => return Ok(None),
            }
        }
        Ok(present(Value::Object(current.clone())))
    }

    fn write(&self, key: &StoreKey, document: &Value) -> Result<(), StoreError> {
        if is_absent(document) {
            return self.remove(key);
        }
        let mut state = self.state.write();
        state.mutations += 1;
        let segments: Vec<&str> = key.segments().collect();
        let Some((last, ancestors)) = segments.split_last() else {
            state.root = match document {
                Value::Object(map) => map.clone(),
                _ => {
                    return Err(StoreError::Decode {
                        key: key.to_string(),
                        reason: "root document must be an object".to_string(),
                    })
                }
            };
            return Ok(());
        };
        let mut current = &mut state.root;
        for segment in ancestors {
            let child = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            current = child.as_object_mut().ok_or_else(|| StoreError::Decode {
                key: key.to_string(),
                reason: format!("'{}' is not an object", segment),
            })?;
        }
        current.insert(last.to_string(), document.clone());
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.mutations += 1;
        let segments: Vec<&str> = key.segments().collect();
        if segments.is_empty() {
            state.root.clear();
            return Ok(());
        }
        remove_and_prune(&mut state.root, &segments);
        Ok(())
    }
}

/// Remove the entry at `segments`, then drop ancestors left empty.
fn remove_and_prune(map: &mut Map<String, Value>, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            map.shift_remove(*last);
        }
        [first, rest @ ..] => {
            let now_empty = match map.get_mut(*first) {
                Some(Value::Object(child)) => {
                    remove_and_prune(child, rest);
                    child.is_empty()
                }
                _ => false,
            };
            if now_empty {
                map.shift_remove(*first);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(path: &str) -> StoreKey {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(StoreKey::root(), |k, s| k.child(s))
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let store = MemoryTreeStore::new();
        assert!(store.fetch(&StoreKey::root()).unwrap().is_none());
        assert!(store.fetch(&key("a/b")).unwrap().is_none());
    }

    #[test]
    fn test_write_nests_under_parent() {
        let store = MemoryTreeStore::new();
        store.write(&key("a"), &json!({"kind": "DIRECTORY"})).unwrap();
        store.write(&key("a/b"), &json!({"kind": "FILE"})).unwrap();
        assert_eq!(
            store.fetch(&key("a")).unwrap().unwrap(),
            json!({"kind": "DIRECTORY", "b": {"kind": "FILE"}})
        );
        assert_eq!(store.mutation_count(), 2);
    }

    #[test]
    fn test_write_creates_intermediate_objects() {
        let store = MemoryTreeStore::new();
        store.write(&key("x/y/z"), &json!({"kind": "FILE"})).unwrap();
        assert!(store.fetch(&key("x/y")).unwrap().is_some());
    }

    #[test]
    fn test_remove_prunes_empty_ancestors() {
        let store = MemoryTreeStore::new();
        store.write(&key("x/y/z"), &json!({"kind": "FILE"})).unwrap();
        store.remove(&key("x/y/z")).unwrap();
        assert!(store.fetch(&key("x")).unwrap().is_none());
        assert_eq!(store.snapshot(), json!({}));
    }

    #[test]
    fn test_put_replaces_document() {
        let store = MemoryTreeStore::new();
        store.write(&key("a"), &json!({"kind": "DIRECTORY", "id": "1"})).unwrap();
        store.write(&key("a"), &json!({"kind": "FILE"})).unwrap();
        assert_eq!(store.fetch(&key("a")).unwrap().unwrap(), json!({"kind": "FILE"}));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let store = MemoryTreeStore::new();
        for name in ["zeta", "alpha", "mid"] {
            store.write(&key(name), &json!({"kind": "DIRECTORY"})).unwrap();
        }
        let root = store.fetch(&StoreKey::root()).unwrap().unwrap();
        let keys: Vec<&String> = root.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
