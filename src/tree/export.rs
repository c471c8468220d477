//! Tree serializer: renders a flattened subtree as nested XML markup.
//!
//! Directories become an opening/closing tag pair wrapping their children,
//! files a single self-closed tag named after the file's store-key leaf.
//! Children keep the store's document order.

use crate::tree::traversal::TreeEntry;
use crate::types::NodeKind;
use std::io::Write;
use std::path::Path;

/// Tag wrapping the whole rendering.
pub const ROOT_TAG: &str = "root";

const INDENT: &str = "\t";

/// Render the tree under a `<root>` element, one element per line, with no blank lines.
pub fn render_xml(root: &TreeEntry) -> String {
    let mut lines = Vec::new();
    lines.push(format!("<{}>", ROOT_TAG));
    for child in &root.children {
        render_entry(child, 1, &mut lines);
    }
    lines.push(format!("</{}>", ROOT_TAG));

    let mut out = lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

fn render_entry(entry: &TreeEntry, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match entry.kind {
        NodeKind::Directory => {
            let tag = tag_name(&entry.name);
            lines.push(format!("{}<{}>", indent, tag));
            for child in &entry.children {
                render_entry(child, depth + 1, lines);
            }
            lines.push(format!("{}</{}>", indent, tag));
        }
        NodeKind::File => {
            lines.push(format!("{}<{}/>", indent, tag_name(&entry.key_leaf)));
        }
    }
}

/// Make a node name usable as an XML element name: characters outside
/// `[A-Za-z0-9_.-]` become `_`, and a name not starting with a letter or `_`
/// gets a leading `_`.
pub fn tag_name(name: &str) -> String {
    let mut tag: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let starts_ok = tag
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !starts_ok {
        tag.insert(0, '_');
    }
    tag
}

/// Write `rendering` to `target` through a temporary file in the same
/// directory, so a failed export never leaves a partial file behind.
pub fn write_atomically(target: &Path, rendering: &str) -> std::io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(rendering.as_bytes())?;
    temp.flush()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
