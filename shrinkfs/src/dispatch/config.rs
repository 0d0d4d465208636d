//! Dispatcher configuration.

use std::str::FromStr;

/// Number of available execution units, at least 1.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// What to do with a file whose transcoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the file out of the tree.
    #[default]
    Omit,
    /// Serve the original, untransformed file instead.
    Passthrough,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(FailurePolicy::Omit),
            "passthrough" => Ok(FailurePolicy::Passthrough),
            other => Err(format!(
                "unknown failure policy '{}', expected 'omit' or 'passthrough'",
                other
            )),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Omit => f.write_str("omit"),
            FailurePolicy::Passthrough => f.write_str("passthrough"),
        }
    }
}

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Worker threads (default: available parallelism).
    pub workers: usize,
    /// Capacity of the scan queue (default: equal to `workers`).
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let workers = default_workers();
        Self {
            workers,
            queue_capacity: workers,
        }
    }
}

impl DispatchConfig {
    /// `workers` threads with a queue of the same capacity.
    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            queue_capacity: workers,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Copy with both values raised to at least 1.
    pub fn normalized(self) -> Self {
        Self {
            workers: self.workers.max(1),
            queue_capacity: self.queue_capacity.max(1),
        }
    }
}
