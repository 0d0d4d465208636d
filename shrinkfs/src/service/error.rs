//! Service error types.

use crate::config::ConfigFileError;
use crate::dispatch::DispatchError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while building or serving the tree.
#[derive(Debug)]
pub enum ServiceError {
    /// Invalid configuration
    ConfigError(String),
    /// The config file could not be loaded
    ConfigFileError(ConfigFileError),
    /// Source root missing or not a directory
    SourceNotFound(PathBuf),
    /// Mountpoint missing or not a directory
    MountpointNotFound(PathBuf),
    /// The worker pool failed
    DispatchError(DispatchError),
    /// FUSE mount or session error
    MountError(io::Error),
    /// Other I/O error
    IoError(io::Error),
}

impl ServiceError {
    /// True if the failure came from the FUSE mount itself.
    pub fn is_mount_error(&self) -> bool {
        matches!(self, Self::MountError(_))
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::ConfigFileError(e) => write!(f, "{}", e),
            Self::SourceNotFound(path) => {
                write!(f, "Source directory does not exist: {}", path.display())
            }
            Self::MountpointNotFound(path) => {
                write!(f, "Mountpoint does not exist: {}", path.display())
            }
            Self::DispatchError(e) => write!(f, "Tree build failed: {}", e),
            Self::MountError(e) => write!(f, "FUSE error: {}", e),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigFileError(e) => Some(e),
            Self::DispatchError(e) => Some(e),
            Self::MountError(e) | Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for ServiceError {
    fn from(e: ConfigFileError) -> Self {
        Self::ConfigFileError(e)
    }
}

impl From<DispatchError> for ServiceError {
    fn from(e: DispatchError) -> Self {
        Self::DispatchError(e)
    }
}

impl From<io::Error> for ServiceError {
    fn from(e: io::Error) -> Self {
        Self::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_config_error() {
        let err = ServiceError::ConfigError("no source".to_string());
        assert_eq!(err.to_string(), "Configuration error: no source");
    }

    #[test]
    fn test_display_missing_paths() {
        let err = ServiceError::MountpointNotFound(PathBuf::from("/mnt/none"));
        assert_eq!(err.to_string(), "Mountpoint does not exist: /mnt/none");

        let err = ServiceError::SourceNotFound(PathBuf::from("/src"));
        assert!(err.to_string().contains("/src"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let service_err: ServiceError = io_err.into();
        assert!(matches!(service_err, ServiceError::IoError(_)));
        assert!(service_err.source().is_some());
        assert!(!service_err.is_mount_error());
    }

    #[test]
    fn test_from_dispatch_error() {
        let err: ServiceError = DispatchError::WorkerPanicked("shrink-worker-0".into()).into();
        assert!(err.to_string().contains("shrink-worker-0"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_mount_error() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ServiceError::MountError(denied);
        assert!(err.is_mount_error());
        assert!(err.to_string().starts_with("FUSE error"));
    }
}
