//! Node model and store-document decoding.
//!
//! A store document is a JSON object holding a node's metadata fields next to
//! one nested object per child. Nodes are read-through projections of those
//! documents and are never cached across commands.

use crate::paths::{leaf_name, StoreKey};
use crate::types::{NodeId, NodeKind};
use serde::Serialize;
use serde_json::{Map, Value};

/// Payload written into every created file.
pub const PLACEHOLDER_CONTENT: &str = "placeholder";

const KIND_FIELD: &str = "kind";
const NAME_FIELD: &str = "name";
const ID_FIELD: &str = "id";
const CONTENT_FIELD: &str = "content";

/// Metadata fields carried by a directory document. Any other key of a
/// directory document is an entry of that directory.
pub const DIRECTORY_METADATA_FIELDS: [&str; 3] = [KIND_FIELD, NAME_FIELD, ID_FIELD];

/// Metadata of a single node, as written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Node {
    pub fn new_directory(name: &str) -> Self {
        Self {
            kind: NodeKind::Directory,
            name: name.to_string(),
            id: NodeId::generate(),
            content: None,
        }
    }

    pub fn new_file(name: &str) -> Self {
        Self {
            kind: NodeKind::File,
            name: name.to_string(),
            id: NodeId::generate(),
            content: Some(PLACEHOLDER_CONTENT.to_string()),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Document body for a PUT. Holds metadata only; children are written
    /// at their own keys.
    pub fn to_document(&self) -> Value {
        let mut map = Map::new();
        map.insert(KIND_FIELD.to_string(), Value::from(self.kind.as_str()));
        map.insert(NAME_FIELD.to_string(), Value::from(self.name.as_str()));
        map.insert(ID_FIELD.to_string(), Value::from(self.id.as_str()));
        if let Some(content) = &self.content {
            map.insert(CONTENT_FIELD.to_string(), Value::from(content.as_str()));
        }
        Value::Object(map)
    }

    /// Decode node metadata from a document. `None` when the document is not
    /// a node (no recognised `kind`). A missing `name` falls back to the key's
    /// leaf segment.
    pub fn decode(key_leaf: &str, document: &Value) -> Option<Self> {
        let map = document.as_object()?;
        let kind = map
            .get(KIND_FIELD)
            .and_then(Value::as_str)
            .and_then(NodeKind::parse)?;
        let name = map
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or(key_leaf)
            .to_string();
        let id = map
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(|s| NodeId::from(s.to_string()))
            .unwrap_or_else(|| NodeId::from(String::new()));
        let content = map
            .get(CONTENT_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            kind,
            name,
            id,
            content,
        })
    }

    /// Name shown in listings: directories carry a leading `/`.
    pub fn listing_name(&self) -> String {
        match self.kind {
            NodeKind::Directory => format!("/{}", self.name),
            NodeKind::File => self.name.clone(),
        }
    }
}

/// A fetched document at a store key. The root has no metadata of its own.
#[derive(Debug, Clone)]
pub struct FetchedNode {
    key: StoreKey,
    node: Option<Node>,
    document: Value,
}

impl FetchedNode {
    /// Root directory projection. A missing root document is an empty root.
    pub fn root(document: Option<Value>) -> Self {
        Self {
            key: StoreKey::root(),
            node: None,
            document: document.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }

    /// Projection of a non-root document, or `None` if it is not a node.
    pub fn decode(key: &StoreKey, document: Value) -> Option<Self> {
        let node = Node::decode(leaf_name(key.as_str()), &document)?;
        Some(Self {
            key: key.clone(),
            node: Some(node),
            document,
        })
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Node metadata; `None` for the root.
    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn kind(&self) -> NodeKind {
        self.node
            .as_ref()
            .map(|n| n.kind)
            .unwrap_or(NodeKind::Directory)
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    /// Children in the document's key order, as `(store key leaf, child)`.
    pub fn children(&self) -> impl Iterator<Item = (&str, FetchedNode)> + '_ {
        self.document
            .as_object()
            .into_iter()
            .flat_map(|map| map.iter())
            .filter_map(move |(leaf, value)| {
                let child = FetchedNode::decode(&self.key.child(leaf), value.clone())?;
                Some((leaf.as_str(), child))
            })
    }

    /// Number of document keys beyond the directory metadata fields,
    /// whether or not they decode as nodes.
    pub fn entry_count(&self) -> usize {
        self.document
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|key| !DIRECTORY_METADATA_FIELDS.contains(&key.as_str()))
                    .count()
            })
            .unwrap_or(0)
    }

    /// A directory with no keys beyond its own metadata fields. Keys that
    /// are not nodes still count, so removing the directory never drops data.
    pub fn is_empty_directory(&self) -> bool {
        self.is_directory() && self.entry_count() == 0
    }
}
