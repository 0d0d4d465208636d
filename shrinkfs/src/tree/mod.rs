//! The in-memory virtual tree served by the FUSE layer.
//!
//! Files are stored as [`Node`] trait objects keyed by their path relative
//! to the source root. Directories are never stored: they exist because a
//! file path passes through them.

mod node;
mod virtual_tree;

pub use node::{Node, NodeAttributes, PassthroughNode, TranscodedNode};
pub use virtual_tree::{DirEntry, EntryKind, TreeError, VirtualTree};
