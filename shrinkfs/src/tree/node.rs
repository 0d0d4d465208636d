//! Servable file nodes.

use crate::cache::CachedArtifact;
use crate::scan::FileMetadata;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Attributes reported to the kernel for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAttributes {
    /// Full `st_mode` of the source file.
    pub mode: u32,
    pub size: u64,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
    /// Source stat has no birth time; this is always `ctime`.
    pub crtime: SystemTime,
    pub uid: u32,
    pub gid: u32,
}

impl NodeAttributes {
    fn from_metadata(metadata: &FileMetadata) -> Self {
        Self {
            mode: metadata.mode,
            size: metadata.size,
            atime: metadata.atime,
            mtime: metadata.mtime,
            ctime: metadata.ctime,
            crtime: metadata.ctime,
            uid: metadata.uid,
            gid: metadata.gid,
        }
    }

    /// Permission bits only (`mode & 0o7777`).
    pub fn permissions(&self) -> u16 {
        (self.mode & 0o7777) as u16
    }
}

/// A file served by the mount.
///
/// Nodes are immutable once built. Every read returns the whole content;
/// slicing for the kernel happens in the FUSE layer.
pub trait Node: Send + Sync + fmt::Debug {
    fn attributes(&self) -> NodeAttributes;

    /// Full content of the file.
    fn read_all(&self) -> io::Result<Vec<u8>>;

    /// The on-disk file whose bytes this node serves.
    fn content_path(&self) -> &Path;
}

/// Serves a source file unchanged.
#[derive(Debug, Clone)]
pub struct PassthroughNode {
    source: PathBuf,
    metadata: FileMetadata,
}

impl PassthroughNode {
    pub fn new(source: PathBuf, metadata: FileMetadata) -> Self {
        Self { source, metadata }
    }
}

impl Node for PassthroughNode {
    fn attributes(&self) -> NodeAttributes {
        NodeAttributes::from_metadata(&self.metadata)
    }

    fn read_all(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.source)
    }

    fn content_path(&self) -> &Path {
        &self.source
    }
}

/// Serves a cached artifact in place of a source image.
///
/// Timestamps, ownership and mode come from the source file; the size is
/// the artifact's.
#[derive(Debug, Clone)]
pub struct TranscodedNode {
    artifact: CachedArtifact,
    metadata: FileMetadata,
}

impl TranscodedNode {
    pub fn new(artifact: CachedArtifact, source_metadata: FileMetadata) -> Self {
        Self {
            metadata: source_metadata.with_size(artifact.size),
            artifact,
        }
    }

    pub fn artifact(&self) -> &CachedArtifact {
        &self.artifact
    }
}

impl Node for TranscodedNode {
    fn attributes(&self) -> NodeAttributes {
        NodeAttributes::from_metadata(&self.metadata)
    }

    fn read_all(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.artifact.path)
    }

    fn content_path(&self) -> &Path {
        &self.artifact.path
    }
}
