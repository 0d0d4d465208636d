//! Cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by concurrent workers.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    transcodes: AtomicU64,
    failures: AtomicU64,
    bytes_written: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    /// Resolutions served by an existing artifact.
    pub hits: u64,
    /// Resolutions that ran the transcoder.
    pub transcodes: u64,
    pub failures: u64,
    pub bytes_written: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of successful resolutions served from disk (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.transcodes;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transcode(&self, bytes: u64) {
        self.transcodes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            transcodes: self.transcodes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}
