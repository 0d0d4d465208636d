//! Content hashing for cache keys.

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a file's full contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash `data` in one pass.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("foo")
        assert_eq!(
            ContentHash::of(b"foo").to_hex(),
            "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
        );
    }

    #[test]
    fn test_identical_content_identical_hash() {
        assert_eq!(ContentHash::of(b"same bytes"), ContentHash::of(b"same bytes"));
        assert_ne!(ContentHash::of(b"same bytes"), ContentHash::of(b"other bytes"));
    }

    #[test]
    fn test_hex_is_fixed_width() {
        let hash = ContentHash::of(b"");
        assert_eq!(hash.to_hex().len(), 64);
        assert_eq!(hash.as_bytes()[0], 0xe3);
        assert!(format!("{:?}", ContentHash::of(b"")).starts_with("ContentHash("));
    }
}
