//! The service facade: wires scanner, cache, dispatcher and FUSE together.

use super::config::ServiceConfig;
use super::error::ServiceError;
use super::mount::MountConfig;
use crate::cache::{JpegTranscoder, TranscodeCache, Transcoder};
use crate::dispatch::{BuiltTree, Dispatcher};
use crate::fuse::ShrinkFS;
use crate::log::Logger;
use crate::scan::Scanner;
use crate::{log_error, log_info, panic};
use std::path::Path;
use std::sync::Arc;

/// Builds the downsized mirror of a source tree and serves it over FUSE.
pub struct ShrinkService {
    config: ServiceConfig,
    cache: Arc<TranscodeCache>,
    logger: Arc<dyn Logger>,
}

impl ShrinkService {
    /// Create a service using the production JPEG transcoder.
    pub fn new(config: ServiceConfig, logger: Arc<dyn Logger>) -> Self {
        let transcoder = JpegTranscoder::new()
            .with_max_dimension(config.max_dimension())
            .with_quality(config.quality());
        Self::with_transcoder(config, Arc::new(transcoder), logger)
    }

    /// Create a service with a custom transcoder.
    pub fn with_transcoder(
        config: ServiceConfig,
        transcoder: Arc<dyn Transcoder>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let cache = Arc::new(TranscodeCache::new(
            config.cache_directory(),
            transcoder,
            Arc::clone(&logger),
        ));
        Self {
            config,
            cache,
            logger,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<TranscodeCache> {
        &self.cache
    }

    /// Scan the source and build the complete tree.
    ///
    /// Each call scans again and returns a new tree; artifacts cached by an
    /// earlier build are reused.
    pub fn build_tree(&self) -> Result<BuiltTree, ServiceError> {
        let source = self.config.source();
        if !source.is_dir() {
            return Err(ServiceError::SourceNotFound(source.to_path_buf()));
        }

        log_info!(
            self.logger,
            "Building tree for {} (cache: {}, {} workers, on failure: {})",
            source.display(),
            self.config.cache_directory().display(),
            self.config.dispatch().workers,
            self.config.on_failure()
        );

        let scanner = Scanner::new(source, Arc::clone(&self.logger))
            .with_follow_links(self.config.follow_links());
        let dispatcher = Dispatcher::new(
            self.config.dispatch(),
            Arc::clone(&self.cache),
            self.config.on_failure(),
            Arc::clone(&self.logger),
        );

        Ok(dispatcher.build_from_scan(&scanner)?)
    }

    /// Build the tree, then mount it at `mountpoint`.
    ///
    /// Blocks until the filesystem is unmounted (e.g. via `fusermount -u`).
    /// Nothing is mounted until the whole tree is built.
    pub fn serve(&self, mountpoint: &Path) -> Result<(), ServiceError> {
        if !mountpoint.is_dir() {
            return Err(ServiceError::MountpointNotFound(mountpoint.to_path_buf()));
        }

        let built = self.build_tree()?;
        let fs = ShrinkFS::new(&built.tree, Arc::clone(&self.logger));
        drop(built);

        let options = MountConfig::for_source(self.config.source()).to_mount_options();

        log_info!(
            self.logger,
            "Mounting {} at {}",
            self.config.source().display(),
            mountpoint.display()
        );

        panic::register_mount(mountpoint.to_path_buf());
        let result = fuser::mount2(fs, mountpoint, &options);
        panic::unregister_mount(mountpoint);

        match result {
            Ok(()) => {
                log_info!(self.logger, "Unmounted {}", mountpoint.display());
                Ok(())
            }
            Err(e) => {
                log_error!(self.logger, "Mount at {} failed: {}", mountpoint.display(), e);
                Err(ServiceError::MountError(e))
            }
        }
    }
}
