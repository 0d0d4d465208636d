//! Cache records and error types.

use super::hash::ContentHash;
use std::path::PathBuf;
use thiserror::Error;

/// A transcoded image stored in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    pub hash: ContentHash,
    pub path: PathBuf,
    /// Length of the artifact on disk, served as the node's size.
    pub size: u64,
}

/// Failure inside a [`super::Transcoder`].
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image has zero width or height")]
    EmptyImage,

    #[error("transcoder panicked: {0}")]
    Panicked(String),
}

/// Failure resolving a source file to a cached artifact.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read source {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to transcode {path}: {source}")]
    Transcode {
        path: PathBuf,
        #[source]
        source: TranscodeError,
    },

    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_names_the_source_path() {
        let err = CacheError::ReadSource {
            path: PathBuf::from("/photos/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/photos/a.jpg"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_transcode_error_display() {
        assert_eq!(
            TranscodeError::EmptyImage.to_string(),
            "image has zero width or height"
        );
        assert_eq!(
            TranscodeError::Panicked("bad marker".into()).to_string(),
            "transcoder panicked: bad marker"
        );
    }
}
