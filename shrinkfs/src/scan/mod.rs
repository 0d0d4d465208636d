//! Source tree enumeration.
//!
//! The [`Scanner`] walks the source directory on the calling thread and
//! yields one [`SourceEntry`] per regular file. Entries that can't be
//! stat'ed are skipped and counted; the walk always runs to completion.

mod entry;
mod scanner;

pub use entry::{unix_time, FileMetadata, SourceEntry};
pub use scanner::{ScanIter, Scanner};
