//! Settings structs, one per `[section]` of the INI file.

use crate::dispatch::FailurePolicy;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub dispatch: DispatchSettings,
    pub scan: ScanSettings,
    pub transcode: TranscodeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Where transcoded artifacts are stored.
    pub directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Worker threads, at least 1.
    pub workers: usize,
    /// Scan queue capacity. `None` means the same as `workers`.
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Follow symbolic links while walking the source tree.
    pub follow_links: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSettings {
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    /// File name inside `directory`.
    pub file: String,
}
