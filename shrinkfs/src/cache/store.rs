//! The transcode cache.

use super::hash::ContentHash;
use super::path::artifact_path;
use super::stats::{CacheStats, CacheStatsSnapshot};
use super::transcode::Transcoder;
use super::types::{CacheError, CachedArtifact, TranscodeError};
use crate::log::Logger;
use crate::panic::payload_message;
use crate::{log_debug, log_info};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Resolves source images to downsized artifacts, keyed by content.
///
/// The cache directory is created on the first write and never pruned.
/// Artifacts survive restarts: a later process pointed at the same
/// directory serves previously transcoded content without decoding it.
///
/// Resolutions of the same content are serialized through a per-hash lock,
/// so concurrent workers holding duplicate images run the transcoder once
/// and the rest observe the published file. Artifacts are written to a
/// temporary file in the cache directory and renamed into place. A lock is
/// dropped from the map once no resolver holds it.
pub struct TranscodeCache {
    directory: PathBuf,
    transcoder: Arc<dyn Transcoder>,
    key_locks: DashMap<ContentHash, Arc<Mutex<()>>>,
    stats: CacheStats,
    logger: Arc<dyn Logger>,
}

impl TranscodeCache {
    /// Create a cache rooted at `directory`. Nothing is touched on disk yet.
    pub fn new(
        directory: impl Into<PathBuf>,
        transcoder: Arc<dyn Transcoder>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            directory: directory.into(),
            transcoder,
            key_locks: DashMap::new(),
            stats: CacheStats::new(),
            logger,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Where the artifact for `hash` lives, whether or not it exists yet.
    pub fn artifact_path(&self, hash: &ContentHash) -> PathBuf {
        artifact_path(&self.directory, hash)
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Resolve the file at `path` to its cached artifact, transcoding it on
    /// a miss.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the source can't be read, the transcoder
    /// rejects it, or the artifact can't be written.
    pub fn resolve(&self, path: &Path) -> Result<CachedArtifact, CacheError> {
        let result = self.resolve_inner(path);
        if result.is_err() {
            self.stats.record_failure();
        }
        result
    }

    fn resolve_inner(&self, path: &Path) -> Result<CachedArtifact, CacheError> {
        let data = fs::read(path).map_err(|source| CacheError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = ContentHash::of(&data);

        let key_lock = self.key_lock(hash);
        let result = {
            let _guard = key_lock.lock();
            self.resolve_locked(path, &data, hash)
        };

        // Only the map holds the lock once every resolver has let go.
        drop(key_lock);
        self.key_locks.remove_if(&hash, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Return the artifact for `hash`, transcoding `data` if it isn't on
    /// disk yet. Callers hold the per-hash lock.
    fn resolve_locked(
        &self,
        path: &Path,
        data: &[u8],
        hash: ContentHash,
    ) -> Result<CachedArtifact, CacheError> {
        let target = self.artifact_path(&hash);

        if let Some(size) = existing_artifact_size(&target) {
            log_debug!(
                self.logger,
                "Cache hit for {} ({})",
                path.display(),
                hash
            );
            self.stats.record_hit();
            return Ok(CachedArtifact {
                hash,
                path: target,
                size,
            });
        }

        log_debug!(
            self.logger,
            "Cache miss for {} ({}), transcoding with {}",
            path.display(),
            hash,
            self.transcoder.name()
        );

        let encoded = self.transcode(data).map_err(|source| CacheError::Transcode {
            path: path.to_path_buf(),
            source,
        })?;

        self.publish(&target, &encoded)?;
        let size = encoded.len() as u64;
        self.stats.record_transcode(size);

        log_info!(
            self.logger,
            "Transcoded {} ({} -> {} bytes)",
            path.display(),
            data.len(),
            size
        );

        Ok(CachedArtifact {
            hash,
            path: target,
            size,
        })
    }

    /// Run the transcoder, turning a panic into an error for this file.
    fn transcode(&self, data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.transcoder.transcode(data)))
            .unwrap_or_else(|payload| Err(TranscodeError::Panicked(payload_message(&*payload))))
    }

    fn key_lock(&self, hash: ContentHash) -> Arc<Mutex<()>> {
        Arc::clone(
            self.key_locks
                .entry(hash)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Write `data` to a temp file in the cache directory, then rename it
    /// to `target`.
    fn publish(&self, target: &Path, data: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.directory).map_err(|source| CacheError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        let write_err = |source: io::Error| CacheError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.directory).map_err(write_err)?;
        temp.write_all(data).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(target).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Size of an existing artifact file, or `None` if there isn't one.
fn existing_artifact_size(path: &Path) -> Option<u64> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        _ => None,
    }
}
