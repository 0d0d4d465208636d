//! User configuration from `~/.shrinkfs/config.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`] and INI
//! parsing in `parser`. Every value is optional; missing keys keep their
//! defaults and command-line flags are applied on top by the caller.
//!
//! ```ini
//! [cache]
//! directory = ~/.cache/shrinkfs
//!
//! [dispatch]
//! workers = 8
//!
//! [transcode]
//! on_failure = passthrough
//! ```

mod defaults;
mod file;
mod parser;
mod settings;

pub use defaults::{default_cache_directory, default_log_directory, DEFAULT_LOG_FILE, MIN_WORKERS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, DispatchSettings, LoggingSettings, ScanSettings, TranscodeSettings,
};
