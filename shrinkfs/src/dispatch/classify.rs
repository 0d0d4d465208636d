//! Media type detection from file extensions.

use std::path::Path;

/// Media types the dispatcher distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `image/jpeg`, routed through the transcode cache.
    Jpeg,
    /// Everything else is served unchanged.
    Other,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Other => "application/octet-stream",
        }
    }
}

/// File extensions registered for `image/jpeg`.
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "jpe", "jfif"];

/// Classify `path` by its extension, ignoring case. Never fails.
pub fn classify(path: &Path) -> MediaType {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return MediaType::Other;
    };

    if JPEG_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    {
        MediaType::Jpeg
    } else {
        MediaType::Other
    }
}
