//! Default values and the `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::dispatch::{default_workers, FailurePolicy};
use std::path::PathBuf;

/// Lowest accepted worker count.
pub const MIN_WORKERS: usize = 1;

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "shrinkfs.log";

/// `<platform cache dir>/shrinkfs`, or `~/.shrinkfs/cache` if the platform
/// has no cache directory.
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("shrinkfs"))
        .unwrap_or_else(|| config_directory().join("cache"))
}

pub fn default_log_directory() -> PathBuf {
    config_directory().join("logs")
}

/// Raise a worker count below the minimum, warning when it happens.
pub(super) fn clamp_workers(key: &str, value: usize) -> usize {
    if value < MIN_WORKERS {
        tracing::warn!(
            requested = value,
            min = MIN_WORKERS,
            "{} below minimum, clamping to {}",
            key,
            MIN_WORKERS
        );
        MIN_WORKERS
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            cache: CacheSettings {
                directory: default_cache_directory(),
            },
            dispatch: DispatchSettings {
                workers: default_workers(),
                queue_capacity: None,
            },
            scan: ScanSettings { follow_links: true },
            transcode: TranscodeSettings {
                on_failure: FailurePolicy::Omit,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
