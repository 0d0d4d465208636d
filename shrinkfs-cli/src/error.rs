//! CLI error handling with user-friendly messages.

use shrinkfs::config::ConfigFileError;
use shrinkfs::service::ServiceError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Invalid combination of arguments and settings
    Service(ServiceError),
    /// Building the tree or mounting it failed
    Serve(ServiceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Serve(e) if e.is_mount_error() => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. FUSE not installed: install fuse3 (Linux) or macFUSE (macOS)");
                eprintln!("  2. Permissions: You may need to add your user to the 'fuse' group");
                eprintln!(
                    "  3. Mountpoint in use: Try unmounting with: fusermount -u <mountpoint>"
                );
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or pass --config to use another file.",
                    shrinkfs::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Service(e) => write!(f, "{}", e),
            CliError::Serve(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Service(e) | CliError::Serve(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}
