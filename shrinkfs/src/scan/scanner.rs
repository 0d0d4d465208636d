//! Recursive, single-threaded directory walk.

use super::entry::{FileMetadata, SourceEntry};
use crate::log::Logger;
use crate::{log_debug, log_warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Enumerates regular files under a source root.
pub struct Scanner {
    root: PathBuf,
    follow_links: bool,
    logger: Arc<dyn Logger>,
}

impl Scanner {
    /// Create a scanner for `root`. Symbolic links are followed by default.
    pub fn new(root: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self {
            root: root.into(),
            follow_links: true,
            logger,
        }
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start the walk. The returned iterator is lazy and can't be restarted.
    pub fn scan(&self) -> ScanIter {
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter();

        ScanIter {
            walker,
            logger: Arc::clone(&self.logger),
            yielded: 0,
            skipped: 0,
        }
    }
}

/// Lazy sequence of [`SourceEntry`] values produced by [`Scanner::scan`].
pub struct ScanIter {
    walker: walkdir::IntoIter,
    logger: Arc<dyn Logger>,
    yielded: usize,
    skipped: usize,
}

impl ScanIter {
    /// Entries dropped because they couldn't be read or stat'ed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Regular files yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn skip(&mut self) {
        self.skipped += 1;
    }
}

impl Iterator for ScanIter {
    type Item = SourceEntry;

    fn next(&mut self) -> Option<SourceEntry> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    log_warn!(self.logger, "Skipping unreadable entry: {}", e);
                    self.skip();
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    log_warn!(
                        self.logger,
                        "Skipping {}: cannot stat: {}",
                        entry.path().display(),
                        e
                    );
                    self.skip();
                    continue;
                }
            };

            if !metadata.is_file() {
                log_debug!(
                    self.logger,
                    "Skipping {}: not a regular file",
                    entry.path().display()
                );
                continue;
            }

            self.yielded += 1;
            return Some(SourceEntry::new(
                entry.into_path(),
                FileMetadata::from_std(&metadata),
            ));
        }
    }
}
