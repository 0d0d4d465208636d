//! Artifact path construction.

use super::hash::ContentHash;
use std::path::{Path, PathBuf};

/// File extension of every artifact.
pub const ARTIFACT_EXTENSION: &str = "jpg";

/// `<hex-hash>.jpg`
pub fn artifact_file_name(hash: &ContentHash) -> String {
    format!("{}.{}", hash.to_hex(), ARTIFACT_EXTENSION)
}

/// Deterministic location of the artifact for `hash`.
///
/// # Example
///
/// ```
/// use shrinkfs::cache::{artifact_path, ContentHash};
/// use std::path::Path;
///
/// let hash = ContentHash::of(b"foo");
/// let path = artifact_path(Path::new("/cache"), &hash);
/// assert_eq!(
///     path,
///     Path::new("/cache/2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae.jpg")
/// );
/// ```
pub fn artifact_path(cache_dir: &Path, hash: &ContentHash) -> PathBuf {
    cache_dir.join(artifact_file_name(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_is_flat_under_cache_dir() {
        let hash = ContentHash::of(b"abc");
        let path = artifact_path(Path::new("/var/cache/shrinkfs"), &hash);

        assert_eq!(path.parent(), Some(Path::new("/var/cache/shrinkfs")));
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(path.file_stem().unwrap().len(), 64);
    }

    #[test]
    fn test_same_hash_same_path() {
        let dir = Path::new("/c");
        assert_eq!(
            artifact_path(dir, &ContentHash::of(b"x")),
            artifact_path(dir, &ContentHash::of(b"x"))
        );
    }
}
