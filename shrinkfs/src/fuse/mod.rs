//! Read-only FUSE view of a built [`VirtualTree`](crate::tree::VirtualTree).
//!
//! ```text
//! /                      (inode 1, implicit)
//! ├── notes.txt          PassthroughNode -> source file
//! └── photos/            implicit directory
//!     └── pic.jpg        TranscodedNode  -> <cache>/<sha256>.jpg
//! ```

mod attributes;
mod filesystem;
mod inode;

pub use attributes::{file_attr, DirectoryAttributes, BLOCK_SIZE, TTL};
pub use filesystem::ShrinkFS;
pub use inode::{InodeEntry, InodeTable, ROOT_INODE};
