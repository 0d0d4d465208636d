//! Build summary.

use std::fmt;
use std::time::Duration;

/// Counts collected over one tree build.
///
/// Each worker fills its own report; the orchestrator merges them after the
/// join barrier and stamps the wall-clock time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Nodes added to the tree, of every kind.
    pub inserted: u64,
    /// Non-JPEG files served unchanged.
    pub passthrough: u64,
    /// JPEGs served from the transcode cache.
    pub transcoded: u64,
    /// Files left out of the tree after a per-file failure.
    pub dropped: u64,
    /// JPEGs served unchanged because transcoding failed.
    pub fallbacks: u64,
    /// Entries rejected by the tree because their path was already taken.
    pub duplicates: u64,
    /// Entries the scanner had to skip.
    pub skipped: u64,
    pub elapsed: Duration,
}

impl BuildReport {
    /// Fold another worker's counts into this report.
    pub fn merge(&mut self, other: &BuildReport) {
        self.inserted = self.inserted.saturating_add(other.inserted);
        self.passthrough = self.passthrough.saturating_add(other.passthrough);
        self.transcoded = self.transcoded.saturating_add(other.transcoded);
        self.dropped = self.dropped.saturating_add(other.dropped);
        self.fallbacks = self.fallbacks.saturating_add(other.fallbacks);
        self.duplicates = self.duplicates.saturating_add(other.duplicates);
        self.skipped = self.skipped.saturating_add(other.skipped);
    }

    /// Every entry that reached a worker or was skipped by the scanner.
    pub fn seen(&self) -> u64 {
        self.inserted + self.dropped + self.duplicates + self.skipped
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files served ({} transcoded, {} passthrough, {} fallback), \
             {} dropped, {} duplicate, {} skipped in {:.2?}",
            self.inserted,
            self.transcoded,
            self.passthrough,
            self.fallbacks,
            self.dropped,
            self.duplicates,
            self.skipped,
            self.elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_counts() {
        let mut total = BuildReport {
            inserted: 2,
            transcoded: 1,
            passthrough: 1,
            ..Default::default()
        };
        total.merge(&BuildReport {
            inserted: 1,
            fallbacks: 1,
            dropped: 3,
            elapsed: Duration::from_secs(9),
            ..Default::default()
        });

        assert_eq!(total.inserted, 3);
        assert_eq!(total.transcoded, 1);
        assert_eq!(total.fallbacks, 1);
        assert_eq!(total.dropped, 3);
        // Elapsed time belongs to the whole build, not to workers.
        assert_eq!(total.elapsed, Duration::ZERO);
        assert_eq!(total.seen(), 6);
    }

    #[test]
    fn test_display_mentions_counts() {
        let report = BuildReport {
            inserted: 4,
            transcoded: 3,
            passthrough: 1,
            dropped: 1,
            ..Default::default()
        };
        let line = report.to_string();
        assert!(line.starts_with("4 files served (3 transcoded, 1 passthrough, 0 fallback)"));
        assert!(line.contains("1 dropped"));
    }
}
