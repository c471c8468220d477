//! Node model, traversal and serialization of the stored tree.

pub mod export;
pub mod node;
pub mod traversal;

pub use export::render_xml;
pub use node::{FetchedNode, Node};
pub use traversal::{TreeEntry, TreeView};
