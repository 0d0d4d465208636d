//! `fuser::Filesystem` over the inode table.

use super::attributes::{file_attr, DirectoryAttributes, TTL};
use super::inode::{InodeEntry, InodeTable, ROOT_INODE};
use crate::log::Logger;
use crate::tree::VirtualTree;
use crate::{log_debug, log_warn};
use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, Request,
};
use libc::{EIO, EISDIR, ENOENT, ENOTDIR, EROFS};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::sync::Arc;

/// Read-only FUSE filesystem serving a built tree.
///
/// Opening a file loads its whole content once; kernel reads on that handle
/// are answered from the buffer until release.
pub struct ShrinkFS {
    inodes: InodeTable,
    directory_attrs: DirectoryAttributes,
    /// Open file handles to their content.
    handles: HashMap<u64, Vec<u8>>,
    next_fh: u64,
    logger: Arc<dyn Logger>,
}

impl ShrinkFS {
    pub fn new(tree: &VirtualTree, logger: Arc<dyn Logger>) -> Self {
        Self::with_directory_attributes(tree, DirectoryAttributes::for_current_user(), logger)
    }

    pub fn with_directory_attributes(
        tree: &VirtualTree,
        directory_attrs: DirectoryAttributes,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            inodes: InodeTable::from_tree(tree),
            directory_attrs,
            handles: HashMap::new(),
            next_fh: 1,
            logger,
        }
    }

    pub fn inodes(&self) -> &InodeTable {
        &self.inodes
    }

    /// Number of file handles currently open.
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }

    fn attr(&self, ino: u64) -> Result<FileAttr, i32> {
        match self.inodes.get(ino) {
            Some(InodeEntry::File { node, .. }) => Ok(file_attr(ino, &node.attributes())),
            Some(InodeEntry::Directory { .. }) => Ok(self
                .directory_attrs
                .to_file_attr(ino, self.inodes.subdirectory_count(ino))),
            None => Err(ENOENT),
        }
    }

    fn lookup_child(&self, parent: u64, name: &OsStr) -> Result<FileAttr, i32> {
        match self.inodes.get(parent) {
            Some(InodeEntry::Directory { .. }) => {}
            Some(InodeEntry::File { .. }) => return Err(ENOTDIR),
            None => return Err(ENOENT),
        }
        let ino = self.inodes.lookup(parent, name).ok_or(ENOENT)?;
        self.attr(ino)
    }

    fn open_file(&mut self, ino: u64, flags: i32) -> Result<u64, i32> {
        if flags & libc::O_ACCMODE != libc::O_RDONLY {
            return Err(EROFS);
        }

        let node = match self.inodes.get(ino) {
            Some(InodeEntry::File { node, .. }) => node,
            Some(InodeEntry::Directory { .. }) => return Err(EISDIR),
            None => return Err(ENOENT),
        };

        let content = node.read_all().map_err(|e| {
            log_warn!(
                self.logger,
                "Failed to read {}: {}",
                node.content_path().display(),
                e
            );
            EIO
        })?;

        let fh = self.next_fh;
        self.next_fh += 1;
        self.handles.insert(fh, content);
        Ok(fh)
    }

    fn read_handle(&self, fh: u64, offset: i64, size: u32) -> Result<&[u8], i32> {
        let content = self.handles.get(&fh).ok_or(EIO)?;
        Ok(slice_at(content, offset, size))
    }

    fn release_handle(&mut self, fh: u64) {
        self.handles.remove(&fh);
    }

    /// `.`, `..` and the children of `ino`, in sorted order.
    fn dir_entries(&self, ino: u64) -> Result<Vec<(u64, FileType, OsString)>, i32> {
        let (parent, children) = match self.inodes.get(ino) {
            Some(InodeEntry::Directory {
                parent, children, ..
            }) => (*parent, children),
            Some(InodeEntry::File { .. }) => return Err(ENOTDIR),
            None => return Err(ENOENT),
        };

        let mut entries = Vec::with_capacity(children.len() + 2);
        entries.push((ino, FileType::Directory, OsString::from(".")));
        entries.push((parent, FileType::Directory, OsString::from("..")));
        for (name, child) in children {
            let kind = match self.inodes.get(*child) {
                Some(InodeEntry::Directory { .. }) => FileType::Directory,
                _ => FileType::RegularFile,
            };
            entries.push((*child, kind, name.clone()));
        }
        Ok(entries)
    }
}

/// The part of `content` covered by a read of `size` bytes at `offset`.
fn slice_at(content: &[u8], offset: i64, size: u32) -> &[u8] {
    let start = usize::try_from(offset).unwrap_or(0).min(content.len());
    let end = start.saturating_add(size as usize).min(content.len());
    &content[start..end]
}

impl Filesystem for ShrinkFS {
    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        log_debug!(self.logger, "lookup: parent={}, name={:?}", parent, name);

        match self.lookup_child(parent, name) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn getattr(&mut self, _req: &Request, ino: u64, reply: ReplyAttr) {
        log_debug!(self.logger, "getattr: ino={}", ino);

        match self.attr(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(errno) => reply.error(errno),
        }
    }

    fn open(&mut self, _req: &Request, ino: u64, flags: i32, reply: ReplyOpen) {
        log_debug!(self.logger, "open: ino={}, flags={:#o}", ino, flags);

        match self.open_file(ino, flags) {
            Ok(fh) => reply.opened(fh, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn read(
        &mut self,
        _req: &Request,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock: Option<u64>,
        reply: ReplyData,
    ) {
        log_debug!(
            self.logger,
            "read: ino={}, fh={}, offset={}, size={}",
            ino,
            fh,
            offset,
            size
        );

        match self.read_handle(fh, offset, size) {
            Ok(data) => reply.data(data),
            Err(errno) => reply.error(errno),
        }
    }

    fn release(
        &mut self,
        _req: &Request,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        self.release_handle(fh);
        reply.ok();
    }

    fn opendir(&mut self, _req: &Request, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.inodes.get(ino) {
            Some(InodeEntry::Directory { .. }) => reply.opened(0, 0),
            Some(InodeEntry::File { .. }) => reply.error(ENOTDIR),
            None => reply.error(ENOENT),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        log_debug!(self.logger, "readdir: ino={}, offset={}", ino, offset);

        let entries = match self.dir_entries(ino) {
            Ok(entries) => entries,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        let skip = usize::try_from(offset).unwrap_or(0);
        for (i, (child, kind, name)) in entries.into_iter().enumerate().skip(skip) {
            // reply.add returns true once the buffer is full
            if reply.add(child, (i + 1) as i64, kind, &name) {
                break;
            }
        }
        reply.ok();
    }

    fn releasedir(&mut self, _req: &Request, _ino: u64, _fh: u64, _flags: i32, reply: ReplyEmpty) {
        reply.ok();
    }
}

impl std::fmt::Debug for ShrinkFS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShrinkFS")
            .field("inodes", &self.inodes.len())
            .field("open_handles", &self.handles.len())
            .finish()
    }
}
