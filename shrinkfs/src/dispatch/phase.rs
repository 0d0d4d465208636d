//! Build lifecycle.

use std::fmt;
use thiserror::Error;

/// Stages a tree build moves through, strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildPhase {
    Unbuilt,
    /// The scanner is feeding the queue.
    Scanning,
    /// The queue is closed; workers are finishing in-flight files.
    Draining,
    /// Every worker has joined. The tree is read-only from here on.
    Built,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid build phase transition {from} -> {to}")]
pub struct PhaseError {
    pub from: BuildPhase,
    pub to: BuildPhase,
}

impl BuildPhase {
    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<BuildPhase> {
        match self {
            BuildPhase::Unbuilt => Some(BuildPhase::Scanning),
            BuildPhase::Scanning => Some(BuildPhase::Draining),
            BuildPhase::Draining => Some(BuildPhase::Built),
            BuildPhase::Built => None,
        }
    }

    /// Move to `to`, which must be the immediate successor.
    pub fn advance(&mut self, to: BuildPhase) -> Result<(), PhaseError> {
        if self.next() != Some(to) {
            return Err(PhaseError { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildPhase::Unbuilt => "unbuilt",
            BuildPhase::Scanning => "scanning",
            BuildPhase::Draining => "draining",
            BuildPhase::Built => "built",
        };
        f.write_str(name)
    }
}
