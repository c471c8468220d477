//! Tree traversal over the remote store: existence and emptiness predicates,
//! immediate-child listings and subtree flattening for export.

use crate::error::StoreError;
use crate::paths::{leaf_name, StoreKey};
use crate::store::TreeStore;
use crate::tree::node::{FetchedNode, Node};
use crate::types::NodeKind;

/// Flattened subtree entry used by the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    /// Display name from the node's `name` field.
    pub name: String,
    /// Leaf of the store key; differs from `name` for suffixed files.
    pub key_leaf: String,
    pub kind: NodeKind,
    pub children: Vec<TreeEntry>,
}

/// Read-only view of the tree held by a store.
pub struct TreeView<'a, S: TreeStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TreeStore + ?Sized> TreeView<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the node at `key`. The root always exists; any other key is
    /// absent when the store has no document there or the document is not a node.
    pub fn fetch_node(&self, key: &StoreKey) -> Result<Option<FetchedNode>, StoreError> {
        let document = self.store.fetch(key)?;
        if key.is_root() {
            return Ok(Some(FetchedNode::root(document)));
        }
        Ok(document.and_then(|doc| {
            let fetched = FetchedNode::decode(key, doc);
            if fetched.is_none() {
                tracing::debug!(key = %key, "document at key is not a node");
            }
            fetched
        }))
    }

    pub fn exists(&self, key: &StoreKey) -> Result<bool, StoreError> {
        Ok(self.fetch_node(key)?.is_some())
    }

    pub fn is_directory(&self, key: &StoreKey) -> Result<bool, StoreError> {
        Ok(self
            .fetch_node(key)?
            .map(|fetched| fetched.is_directory())
            .unwrap_or(false))
    }

    /// True iff `key` is an existing directory with no keys beyond its own
    /// metadata fields. Absent paths and files are not empty directories.
    pub fn is_empty_directory(&self, key: &StoreKey) -> Result<bool, StoreError> {
        Ok(self
            .fetch_node(key)?
            .map(|fetched| fetched.is_empty_directory())
            .unwrap_or(false))
    }

    /// Display names of the immediate children of `key`, in document order.
    /// Directories carry a leading `/`; a file lists as itself. `None` when
    /// `key` does not exist.
    pub fn list_immediate_children(
        &self,
        key: &StoreKey,
    ) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.fetch_node(key)?.map(|fetched| match fetched.node() {
            Some(node) if !node.is_directory() => vec![node.listing_name()],
            _ => fetched
                .children()
                .filter_map(|(_, child)| child.node().map(Node::listing_name))
                .collect(),
        }))
    }

    /// Fetch the subtree rooted at `key` in one request and flatten it.
    /// `None` when `key` does not exist.
    pub fn flatten_subtree(&self, key: &StoreKey) -> Result<Option<TreeEntry>, StoreError> {
        Ok(self.fetch_node(key)?.map(|fetched| flatten(&fetched)))
    }
}

fn flatten(fetched: &FetchedNode) -> TreeEntry {
    let key_leaf = leaf_name(fetched.key().as_str()).to_string();
    let name = fetched
        .node()
        .map(|n| n.name.clone())
        .unwrap_or_else(|| key_leaf.clone());
    let children = if fetched.is_directory() {
        fetched.children().map(|(_, child)| flatten(&child)).collect()
    } else {
        Vec::new()
    };
    TreeEntry {
        name,
        key_leaf,
        kind: fetched.kind(),
        children,
    }
}
