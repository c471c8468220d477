//! Remote Tree Store
//!
//! Typed access to the JSON document store that persists the tree. Every
//! filesystem path maps to a store endpoint; a document at a key holds the
//! node's metadata fields plus one nested object per child.
//!
//! Operations are single-request and non-transactional: there is no
//! check-and-set, so two callers racing on one key both see "absent" and the
//! last write wins.

pub mod memory;
pub mod rest;

use crate::error::StoreError;
use crate::paths::StoreKey;
use serde_json::Value;

pub use memory::MemoryTreeStore;
pub use rest::RestTreeStore;

/// Fetch / write / remove capability over the backing document store.
pub trait TreeStore {
    /// GET the document at `key`. Absence (null or empty document) is `None`.
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError>;

    /// PUT `document` at `key`, replacing whatever was there.
    fn write(&self, key: &StoreKey, document: &Value) -> Result<(), StoreError>;

    /// DELETE the document at `key`. Children nested under it go with it.
    fn remove(&self, key: &StoreKey) -> Result<(), StoreError>;
}

impl<T: TreeStore + ?Sized> TreeStore for &T {
    fn fetch(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        (**self).fetch(key)
    }

    fn write(&self, key: &StoreKey, document: &Value) -> Result<(), StoreError> {
        (**self).write(key, document)
    }

    fn remove(&self, key: &StoreKey) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// `null` and `{}` both mean the document does not exist.
pub(crate) fn is_absent(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

pub(crate) fn present(document: Value) -> Option<Value> {
    if is_absent(&document) {
        None
    } else {
        Some(document)
    }
}
