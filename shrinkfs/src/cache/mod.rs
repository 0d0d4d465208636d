//! Content-addressed cache of downsized JPEG artifacts.
//!
//! Artifacts are keyed only by the SHA-256 of the source bytes, so the same
//! image reached through different paths (or seen again after a restart)
//! is transcoded once and then served from disk.
//!
//! ```text
//! <cache_dir>/
//! ├── 2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae.jpg
//! └── fcde2b2edba56bf408601fb721fe9b5c338d10ee429ea04fae5511b68fbf8fb9.jpg
//! ```

mod hash;
mod path;
mod stats;
mod store;
mod transcode;
mod types;

pub use hash::ContentHash;
pub use path::{artifact_file_name, artifact_path, ARTIFACT_EXTENSION};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::TranscodeCache;
pub use transcode::{
    JpegTranscoder, Transcoder, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION,
};
pub use types::{CacheError, CachedArtifact, TranscodeError};
