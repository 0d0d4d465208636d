//! Service configuration types.

use super::error::ServiceError;
use crate::cache::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION};
use crate::config::ConfigFile;
use crate::dispatch::{DispatchConfig, FailurePolicy};
use std::path::{Path, PathBuf};

/// Everything needed to build and serve one mirror.
///
/// # Example
///
/// ```
/// use shrinkfs::service::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .source("/photos")
///     .cache_directory("/tmp/shrinkfs-cache")
///     .workers(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.dispatch().workers, 4);
/// assert_eq!(config.max_dimension(), 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    source: PathBuf,
    cache_directory: PathBuf,
    dispatch: DispatchConfig,
    follow_links: bool,
    on_failure: FailurePolicy,
    max_dimension: u32,
    quality: u8,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Root of the tree being mirrored.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn cache_directory(&self) -> &Path {
        &self.cache_directory
    }

    pub fn dispatch(&self) -> DispatchConfig {
        self.dispatch
    }

    pub fn follow_links(&self) -> bool {
        self.follow_links
    }

    pub fn on_failure(&self) -> FailurePolicy {
        self.on_failure
    }

    /// Largest output width or height in pixels.
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

/// Builder for [`ServiceConfig`].
///
/// Unset values fall back to [`ConfigFile::default()`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    source: Option<PathBuf>,
    cache_directory: Option<PathBuf>,
    workers: Option<usize>,
    queue_capacity: Option<usize>,
    follow_links: Option<bool>,
    on_failure: Option<FailurePolicy>,
    max_dimension: Option<u32>,
    quality: Option<u8>,
}

impl ServiceConfigBuilder {
    /// Start from the values in a loaded config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        Self {
            cache_directory: Some(file.cache.directory.clone()),
            workers: Some(file.dispatch.workers),
            queue_capacity: file.dispatch.queue_capacity,
            follow_links: Some(file.scan.follow_links),
            on_failure: Some(file.transcode.on_failure),
            ..Self::default()
        }
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn cache_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_directory = Some(path.into());
        self
    }

    /// Worker threads. Also resets the queue capacity unless it was set
    /// explicitly afterwards.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self.queue_capacity = None;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = Some(follow);
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = Some(policy);
        self
    }

    pub fn max_dimension(mut self, pixels: u32) -> Self {
        self.max_dimension = Some(pixels);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Finish the configuration. A source directory is required.
    pub fn build(self) -> Result<ServiceConfig, ServiceError> {
        let source = self.source.ok_or_else(|| {
            ServiceError::ConfigError("No source directory configured".to_string())
        })?;

        let dispatch = match self.workers {
            Some(workers) => DispatchConfig::with_workers(workers),
            None => DispatchConfig::default(),
        };
        let dispatch = match self.queue_capacity {
            Some(capacity) => dispatch.with_queue_capacity(capacity),
            None => dispatch,
        }
        .normalized();

        Ok(ServiceConfig {
            source,
            cache_directory: self
                .cache_directory
                .unwrap_or_else(crate::config::default_cache_directory),
            dispatch,
            follow_links: self.follow_links.unwrap_or(true),
            on_failure: self.on_failure.unwrap_or_default(),
            max_dimension: self.max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION).max(1),
            quality: self.quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100),
        })
    }
}
