//! Inode numbering for the mounted tree.

use crate::tree::{Node, VirtualTree};
use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inode of the mount root.
pub const ROOT_INODE: u64 = 1;

/// What an inode refers to.
#[derive(Debug, Clone)]
pub enum InodeEntry {
    Directory {
        path: PathBuf,
        parent: u64,
        /// Children by name, in sorted order.
        children: BTreeMap<OsString, u64>,
    },
    File {
        path: PathBuf,
        parent: u64,
        node: Arc<dyn Node>,
    },
}

impl InodeEntry {
    pub fn path(&self) -> &Path {
        match self {
            InodeEntry::Directory { path, .. } | InodeEntry::File { path, .. } => path,
        }
    }

    pub fn parent(&self) -> u64 {
        match self {
            InodeEntry::Directory { parent, .. } | InodeEntry::File { parent, .. } => *parent,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, InodeEntry::Directory { .. })
    }
}

/// Fixed inode assignment for an immutable tree.
///
/// The root is inode 1. Every other directory and file gets the next number
/// in sorted path order, so the same tree always gets the same numbers.
#[derive(Debug)]
pub struct InodeTable {
    /// Indexed by `ino - 1`.
    entries: Vec<InodeEntry>,
    by_path: HashMap<PathBuf, u64>,
}

impl InodeTable {
    pub fn from_tree(tree: &VirtualTree) -> Self {
        let mut table = Self {
            entries: vec![InodeEntry::Directory {
                path: PathBuf::new(),
                parent: ROOT_INODE,
                children: BTreeMap::new(),
            }],
            by_path: HashMap::from([(PathBuf::new(), ROOT_INODE)]),
        };

        // Merged in path order, a parent always precedes its children.
        let mut pending: BTreeMap<PathBuf, Option<Arc<dyn Node>>> = tree
            .directories()
            .into_iter()
            .map(|dir| (dir, None))
            .collect();
        for (path, node) in tree.iter() {
            pending.insert(path.to_path_buf(), Some(Arc::clone(node)));
        }

        for (path, node) in pending {
            table.add(path, node);
        }
        table
    }

    fn add(&mut self, path: PathBuf, node: Option<Arc<dyn Node>>) {
        let parent_path = path.parent().unwrap_or_else(|| Path::new(""));
        let parent = self.by_path.get(parent_path).copied().unwrap_or(ROOT_INODE);
        let ino = self.entries.len() as u64 + 1;

        if let (Some(name), Some(InodeEntry::Directory { children, .. })) =
            (path.file_name(), self.entries.get_mut((parent - 1) as usize))
        {
            children.insert(name.to_os_string(), ino);
        }

        self.by_path.insert(path.clone(), ino);
        self.entries.push(match node {
            Some(node) => InodeEntry::File { path, parent, node },
            None => InodeEntry::Directory {
                path,
                parent,
                children: BTreeMap::new(),
            },
        });
    }

    pub fn get(&self, ino: u64) -> Option<&InodeEntry> {
        let index = ino.checked_sub(1)?;
        self.entries.get(index as usize)
    }

    /// Inode of `name` inside directory `parent`.
    pub fn lookup(&self, parent: u64, name: &OsStr) -> Option<u64> {
        match self.get(parent)? {
            InodeEntry::Directory { children, .. } => children.get(name).copied(),
            InodeEntry::File { .. } => None,
        }
    }

    pub fn inode_of(&self, path: &Path) -> Option<u64> {
        self.by_path.get(path).copied()
    }

    /// Number of child directories of `ino`.
    pub fn subdirectory_count(&self, ino: u64) -> usize {
        match self.get(ino) {
            Some(InodeEntry::Directory { children, .. }) => children
                .values()
                .filter(|child| self.get(**child).is_some_and(InodeEntry::is_dir))
                .count(),
            _ => 0,
        }
    }

    /// Total inodes, the root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
