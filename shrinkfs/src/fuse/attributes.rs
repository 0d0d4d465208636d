//! Conversion from node attributes to FUSE attributes.

use crate::tree::NodeAttributes;
use fuser::{FileAttr, FileType};
use std::time::{Duration, SystemTime};

/// Attribute and entry cache lifetime handed to the kernel.
///
/// The tree never changes after mount, so this can be long.
pub const TTL: Duration = Duration::from_secs(60);

/// Block size reported for every inode.
pub const BLOCK_SIZE: u32 = 512;

/// Attributes of a file node at `ino`.
pub fn file_attr(ino: u64, attrs: &NodeAttributes) -> FileAttr {
    FileAttr {
        ino,
        size: attrs.size,
        blocks: attrs.size.div_ceil(BLOCK_SIZE as u64),
        atime: attrs.atime,
        mtime: attrs.mtime,
        ctime: attrs.ctime,
        crtime: attrs.crtime,
        kind: FileType::RegularFile,
        perm: attrs.permissions(),
        nlink: 1,
        uid: attrs.uid,
        gid: attrs.gid,
        rdev: 0,
        blksize: BLOCK_SIZE,
        flags: 0,
    }
}

/// Attributes shared by every implicit directory.
///
/// Directories don't exist in the source stat data, so they get read-only
/// permissions, the mounting user's ownership and the tree's build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryAttributes {
    pub uid: u32,
    pub gid: u32,
    pub time: SystemTime,
    pub perm: u16,
}

impl DirectoryAttributes {
    pub fn new(uid: u32, gid: u32, time: SystemTime) -> Self {
        Self {
            uid,
            gid,
            time,
            perm: 0o555,
        }
    }

    /// Owned by the current process's user, stamped now.
    pub fn for_current_user() -> Self {
        // SAFETY: getuid and getgid have no preconditions and cannot fail.
        let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
        Self::new(uid, gid, SystemTime::now())
    }

    /// Attributes for the directory at `ino` with `subdirs` child directories.
    pub fn to_file_attr(&self, ino: u64, subdirs: usize) -> FileAttr {
        FileAttr {
            ino,
            size: 0,
            blocks: 0,
            atime: self.time,
            mtime: self.time,
            ctime: self.time,
            crtime: self.time,
            kind: FileType::Directory,
            perm: self.perm,
            nlink: 2 + subdirs as u32,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: BLOCK_SIZE,
            flags: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::unix_time;

    fn sample() -> NodeAttributes {
        NodeAttributes {
            mode: 0o100640,
            size: 1025,
            atime: unix_time(100, 0),
            mtime: unix_time(200, 0),
            ctime: unix_time(300, 0),
            crtime: unix_time(300, 0),
            uid: 501,
            gid: 20,
        }
    }

    #[test]
    fn test_file_attr_copies_source_stat() {
        let attr = file_attr(42, &sample());

        assert_eq!(attr.ino, 42);
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.size, 1025);
        assert_eq!(attr.blocks, 3);
        assert_eq!(attr.perm, 0o640);
        assert_eq!(attr.uid, 501);
        assert_eq!(attr.gid, 20);
        assert_eq!(attr.mtime, unix_time(200, 0));
        assert_eq!(attr.crtime, attr.ctime);
        assert_eq!(attr.nlink, 1);
    }

    #[test]
    fn test_empty_file_has_no_blocks() {
        let mut attrs = sample();
        attrs.size = 0;
        assert_eq!(file_attr(2, &attrs).blocks, 0);
    }

    #[test]
    fn test_directory_attr() {
        let time = unix_time(1_700_000_000, 0);
        let dir = DirectoryAttributes::new(1000, 1000, time);
        let attr = dir.to_file_attr(1, 3);

        assert_eq!(attr.kind, FileType::Directory);
        assert_eq!(attr.perm, 0o555);
        assert_eq!(attr.nlink, 5);
        assert_eq!(attr.size, 0);
        assert_eq!(attr.mtime, time);
    }

    #[test]
    fn test_current_user_directory() {
        let dir = DirectoryAttributes::for_current_user();
        // SAFETY: see DirectoryAttributes::for_current_user.
        assert_eq!(dir.uid, unsafe { libc::getuid() });
        assert_eq!(dir.perm, 0o555);
    }
}
