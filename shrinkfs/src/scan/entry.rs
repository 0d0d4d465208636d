//! Scanned file records.

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Raw stat data captured for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    /// Full `st_mode`, including the file type bits.
    pub mode: u32,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
    pub uid: u32,
    pub gid: u32,
}

impl FileMetadata {
    /// Capture the fields served to the kernel from `std` metadata.
    pub fn from_std(metadata: &Metadata) -> Self {
        Self {
            size: metadata.size(),
            mode: metadata.mode(),
            atime: unix_time(metadata.atime(), metadata.atime_nsec()),
            mtime: unix_time(metadata.mtime(), metadata.mtime_nsec()),
            ctime: unix_time(metadata.ctime(), metadata.ctime_nsec()),
            uid: metadata.uid(),
            gid: metadata.gid(),
        }
    }

    /// Copy of this metadata reporting a different content length.
    pub fn with_size(self, size: u64) -> Self {
        Self { size, ..self }
    }
}

/// Convert a `(seconds, nanoseconds)` stat timestamp to `SystemTime`.
///
/// Pre-epoch timestamps are supported; `nsecs` is always the non-negative
/// offset added to `secs`, as stat reports it.
pub fn unix_time(secs: i64, nsecs: i64) -> SystemTime {
    let nanos = Duration::from_nanos(nsecs.clamp(0, 999_999_999) as u64);
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}

/// A regular file found during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub metadata: FileMetadata,
}

impl SourceEntry {
    pub fn new(path: PathBuf, metadata: FileMetadata) -> Self {
        Self { path, metadata }
    }

    /// Path of this entry relative to `root`, or `None` if it lies outside.
    pub fn relative_to(&self, root: &Path) -> Option<&Path> {
        self.path.strip_prefix(root).ok()
    }
}
