//! Path utilities
//!
//! Pure functions deriving parent, leaf and store keys from `/`-delimited
//! filesystem paths, plus validation of paths against what the backing
//! document store can address.
//!
//! A filesystem path and its store key diverge for files: the leaf's dotted
//! suffix is removed from the key (`/a/f.txt` is stored at `a/f`) while the
//! node keeps `f.txt` as its display name.

use crate::error::FsError;
use crate::types::NodeKind;
use std::fmt;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Root directory path.
pub const ROOT: &str = "/";

/// Required extension for export targets.
pub const EXPORT_EXTENSION: &str = ".xml";

/// Field names used for node metadata inside a store document.
pub const RESERVED_NAMES: [&str; 4] = ["kind", "name", "id", "content"];

/// Characters the document store rejects inside keys.
const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '$', '#', '[', ']'];

/// True if the path starts with `/`.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Strip the last `/`-delimited segment. The parent of a top-level path is
/// the empty string, which denotes the root.
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last `/`-delimited segment.
pub fn leaf_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Remove the dotted suffix of a leaf name, starting at its first `.`.
pub fn strip_suffix(leaf: &str) -> &str {
    match leaf.find('.') {
        Some(idx) => &leaf[..idx],
        None => leaf,
    }
}

/// True if the export target carries the required extension.
pub fn has_export_extension(path: &str) -> bool {
    path.len() > EXPORT_EXTENSION.len() && path.ends_with(EXPORT_EXTENSION)
}

/// Key addressing a document in the backing store: the path without its
/// leading `/`, with file suffixes removed. The root key is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn root() -> Self {
        StoreKey(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> StoreKey {
        StoreKey(parent(&self.0).to_string())
    }

    pub fn child(&self, segment: &str) -> StoreKey {
        if self.is_root() {
            StoreKey(segment.to_string())
        } else {
            StoreKey(format!("{}{}{}", self.0, SEPARATOR, segment))
        }
    }

    /// Key segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SEPARATOR, self.0)
    }
}

/// A validated filesystem path together with its store key and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: String,
    key: StoreKey,
    name: String,
    kind: NodeKind,
}

impl ResolvedPath {
    pub fn root() -> Self {
        Self {
            path: ROOT.to_string(),
            key: StoreKey::root(),
            name: String::new(),
            kind: NodeKind::Directory,
        }
    }

    /// Resolve a path naming a directory. No segment may carry a suffix.
    pub fn directory(raw: &str) -> Result<Self, FsError> {
        let segments = split_absolute(raw)?;
        let Some((leaf, ancestors)) = segments.split_last() else {
            return Ok(Self::root());
        };
        for segment in ancestors {
            validate_segment(raw, segment)?;
        }
        validate_segment(raw, leaf)?;
        Ok(Self {
            path: raw.to_string(),
            key: StoreKey(segments.join("/")),
            name: (*leaf).to_string(),
            kind: NodeKind::Directory,
        })
    }

    /// Resolve a path naming a file. The leaf's dotted suffix is dropped from
    /// the store key but kept in the display name.
    pub fn file(raw: &str) -> Result<Self, FsError> {
        let segments = split_absolute(raw)?;
        let Some((leaf, ancestors)) = segments.split_last() else {
            return Err(FsError::invalid(raw, "missing file name"));
        };
        for segment in ancestors {
            validate_segment(raw, segment)?;
        }
        let stem = strip_suffix(leaf);
        if stem.is_empty() {
            return Err(FsError::invalid(raw, "missing file name before suffix"));
        }
        validate_segment(raw, stem)?;
        let mut key_segments: Vec<&str> = ancestors.to_vec();
        key_segments.push(stem);
        Ok(Self {
            path: raw.to_string(),
            key: StoreKey(key_segments.join("/")),
            name: (*leaf).to_string(),
            kind: NodeKind::File,
        })
    }

    /// Resolve a path for lookup, where the node kind is not known yet.
    /// A dotted leaf is treated as a file path.
    pub fn lookup(raw: &str) -> Result<Self, FsError> {
        if leaf_name(raw).contains('.') {
            Self::file(raw)
        } else {
            Self::directory(raw)
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Display name written into the node's `name` field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of node the path names: `File` for file paths, else `Directory`.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.key.is_root()
    }

    /// The directory containing this path. The root is its own parent.
    pub fn parent(&self) -> ResolvedPath {
        if self.is_root() {
            return Self::root();
        }
        let parent_path = parent(&self.path);
        if parent_path.is_empty() {
            return Self::root();
        }
        Self {
            path: parent_path.to_string(),
            key: self.key.parent(),
            name: leaf_name(parent_path).to_string(),
            kind: NodeKind::Directory,
        }
    }
}

fn split_absolute(raw: &str) -> Result<Vec<&str>, FsError> {
    if !is_absolute(raw) {
        return Err(FsError::invalid(raw, "path must start with /"));
    }
    if raw == ROOT {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = raw[1..].split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(FsError::invalid(raw, "empty path segment"));
    }
    Ok(segments)
}

fn validate_segment(raw: &str, segment: &str) -> Result<(), FsError> {
    if let Some(c) = segment
        .chars()
        .find(|c| FORBIDDEN_KEY_CHARS.contains(c) || c.is_control())
    {
        return Err(FsError::invalid(
            raw,
            format!("segment '{}' contains forbidden character {:?}", segment, c),
        ));
    }
    if RESERVED_NAMES.contains(&segment) {
        return Err(FsError::invalid(
            raw,
            format!("'{}' is a reserved name", segment),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parent_and_leaf() {
        assert_eq!(parent("/a/b"), "/a");
        assert_eq!(parent("/a"), "");
        assert_eq!(leaf_name("/a/b.txt"), "b.txt");
        assert_eq!(leaf_name("/a"), "a");
    }

    #[test]
    fn test_strip_suffix_uses_first_dot() {
        assert_eq!(strip_suffix("a.txt"), "a");
        assert_eq!(strip_suffix("a.tar.gz"), "a");
        assert_eq!(strip_suffix("plain"), "plain");
        assert_eq!(strip_suffix(".hidden"), "");
    }

    #[test]
    fn test_export_extension() {
        assert!(has_export_extension("out.xml"));
        assert!(!has_export_extension("out.json"));
        assert!(!has_export_extension(".xml"));
    }

    #[test]
    fn test_file_key_and_name_diverge() {
        let resolved = ResolvedPath::file("/users/a.txt").unwrap();
        assert_eq!(resolved.key().as_str(), "users/a");
        assert_eq!(resolved.name(), "a.txt");
        assert_eq!(resolved.path(), "/users/a.txt");
        assert_eq!(resolved.parent().key().as_str(), "users");
        assert_eq!(resolved.parent().path(), "/users");
    }

    #[test]
    fn test_top_level_parent_is_root() {
        let resolved = ResolvedPath::directory("/users").unwrap();
        assert!(resolved.parent().is_root());
        assert_eq!(resolved.parent().path(), "/");
    }

    #[test]
    fn test_rejects_relative_and_empty_segments() {
        assert!(matches!(
            ResolvedPath::directory("users"),
            Err(FsError::InvalidInput { .. })
        ));
        assert!(ResolvedPath::directory("/a//b").is_err());
        assert!(ResolvedPath::directory("/a/").is_err());
    }

    #[test]
    fn test_rejects_forbidden_and_reserved_segments() {
        assert!(ResolvedPath::directory("/a.b").is_err());
        assert!(ResolvedPath::directory("/a$b").is_err());
        assert!(ResolvedPath::directory("/kind").is_err());
        assert!(ResolvedPath::file("/dir.d/f.txt").is_err());
        assert!(ResolvedPath::file("/a/.hidden").is_err());
        assert!(ResolvedPath::file("/").is_err());
    }

    #[test]
    fn test_lookup_picks_file_for_dotted_leaf() {
        assert_eq!(ResolvedPath::lookup("/a/f.txt").unwrap().key().as_str(), "a/f");
        assert_eq!(ResolvedPath::lookup("/a/b").unwrap().key().as_str(), "a/b");
        assert!(ResolvedPath::lookup("/").unwrap().is_root());
        assert_eq!(ResolvedPath::lookup("/a/f.txt").unwrap().kind(), NodeKind::File);
        assert_eq!(ResolvedPath::lookup("/a/b").unwrap().kind(), NodeKind::Directory);
    }

    #[test]
    fn test_store_key_child() {
        let root = StoreKey::root();
        let a = root.child("a");
        assert_eq!(a.as_str(), "a");
        assert_eq!(a.child("b").as_str(), "a/b");
        assert_eq!(a.child("b").to_string(), "/a/b");
        assert_eq!(a.child("b").segments().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_parent_and_leaf_recompose(segments in prop::collection::vec("[a-z0-9_-]{1,8}", 1..6)) {
            let path = format!("/{}", segments.join("/"));
            let recomposed = format!("{}/{}", parent(&path), leaf_name(&path));
            prop_assert_eq!(recomposed, path.clone());
            prop_assert_eq!(leaf_name(&path), segments.last().unwrap().as_str());
        }

        #[test]
        fn prop_directory_key_is_path_without_slash(segments in prop::collection::vec("d[a-z0-9_-]{0,7}", 1..6)) {
            let path = format!("/{}", segments.join("/"));
            let resolved = ResolvedPath::directory(&path).unwrap();
            prop_assert_eq!(resolved.key().as_str(), &path[1..]);
        }

        #[test]
        fn prop_strip_suffix_is_idempotent(stem in "[a-z]{1,8}", ext in "[a-z]{0,4}") {
            let leaf = format!("{}.{}", stem, ext);
            let once = strip_suffix(&leaf);
            prop_assert_eq!(once, stem.as_str());
            prop_assert_eq!(strip_suffix(once), once);
        }
    }
}
