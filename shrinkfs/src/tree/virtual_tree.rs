//! Path-keyed tree of servable nodes.

use super::node::Node;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::ops::Bound;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while inserting into a [`VirtualTree`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid relative path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("path already present: {0:?}")]
    DuplicatePath(PathBuf),

    #[error("path conflicts with an existing file or directory: {0:?}")]
    Conflict(PathBuf),
}

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Ordered map from relative path to node.
///
/// Keys are relative, normalized paths (`photos/2019/pic.jpg`). Because
/// `Path` ordering is component-wise, every descendant of a directory sorts
/// directly after it, which is what the listing queries rely on.
///
/// Inserting needs `&mut self`; once the tree is shared behind an `Arc` it
/// can no longer change.
#[derive(Debug, Default)]
pub struct VirtualTree {
    nodes: BTreeMap<PathBuf, Arc<dyn Node>>,
}

impl VirtualTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` under `path`.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for empty, absolute, or non-normalized paths
    /// - `DuplicatePath` if `path` already holds a node
    /// - `Conflict` if `path` would sit under a file, or over existing files
    pub fn insert(
        &mut self,
        path: impl Into<PathBuf>,
        node: Arc<dyn Node>,
    ) -> Result<(), TreeError> {
        let path = path.into();
        if !is_valid_key(&path) {
            return Err(TreeError::InvalidPath(path));
        }
        if self.nodes.contains_key(&path) {
            return Err(TreeError::DuplicatePath(path));
        }
        let under_file = path
            .ancestors()
            .skip(1)
            .any(|ancestor| self.nodes.contains_key(ancestor));
        if under_file || self.has_descendants(&path) {
            return Err(TreeError::Conflict(path));
        }

        self.nodes.insert(path, node);
        Ok(())
    }

    /// Node stored at `path`, if `path` is a file.
    pub fn lookup(&self, path: &Path) -> Option<&Arc<dyn Node>> {
        self.nodes.get(path)
    }

    /// Listing of the tree's root directory.
    pub fn root(&self) -> Vec<DirEntry> {
        self.list(Path::new("")).unwrap_or_default()
    }

    /// Children of the directory `dir`, sorted by name.
    ///
    /// The empty path is the root. Returns `None` if `dir` is a file or
    /// doesn't exist.
    pub fn list(&self, dir: &Path) -> Option<Vec<DirEntry>> {
        if !self.is_dir(dir) {
            return None;
        }

        let mut entries: Vec<DirEntry> = Vec::new();
        for key in self.descendants(dir) {
            let Ok(rest) = key.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_os_string();
            if entries.last().is_some_and(|last| last.name == name) {
                continue;
            }
            let kind = if components.next().is_some() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntry { name, kind });
        }
        Some(entries)
    }

    /// True for the root and for every directory implied by a file path.
    pub fn is_dir(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return true;
        }
        !self.nodes.contains_key(path) && self.has_descendants(path)
    }

    /// Every implicit directory, excluding the root.
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        let mut dirs = BTreeSet::new();
        for key in self.nodes.keys() {
            for ancestor in key.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    break;
                }
                if !dirs.insert(ancestor.to_path_buf()) {
                    break;
                }
            }
        }
        dirs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Arc<dyn Node>)> {
        self.nodes.iter().map(|(path, node)| (path.as_path(), node))
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn descendants<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.nodes
            .range::<Path, _>((Bound::Excluded(dir), Bound::Unbounded))
            .map(|(key, _)| key)
            .take_while(move |key| key.starts_with(dir))
    }

    fn has_descendants(&self, dir: &Path) -> bool {
        self.descendants(dir).next().is_some()
    }
}

/// Non-empty and made only of normal components.
fn is_valid_key(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
