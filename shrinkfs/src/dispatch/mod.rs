//! Parallel construction of the virtual tree.
//!
//! ```text
//!  Scanner (calling thread)
//!      │  SourceEntry
//!      ▼
//!  bounded channel  ── blocks the scanner when full
//!      │
//!      ├──► worker 0 ─┐
//!      ├──► worker 1 ─┼──► classify ─► TranscodeCache (JPEGs) ─► node
//!      └──► worker N ─┘                                          │
//!                                                                ▼
//!                                          Mutex<VirtualTree>::insert
//! ```
//!
//! [`Dispatcher::build`] joins every worker before it returns the tree, so
//! callers never see a partially built tree.

mod classify;
mod config;
mod phase;
mod pool;
mod report;
mod worker;

pub use classify::{classify, MediaType};
pub use config::{default_workers, DispatchConfig, FailurePolicy};
pub use phase::{BuildPhase, PhaseError};
pub use pool::{BuiltTree, DispatchError, Dispatcher};
pub use report::BuildReport;
