//! shrinkfs - a read-only FUSE mirror that serves downsized JPEGs
//!
//! Every regular file under a source directory appears at the same relative
//! path in the mount. JPEGs are replaced by copies whose larger side is at
//! most 2000 pixels, stored in a cache keyed by the SHA-256 of the original
//! bytes; everything else is served unchanged.
//!
//! The whole tree is built before the mount appears:
//!
//! ```text
//! scan ──► dispatch (worker pool) ──► cache / tree ──► fuse
//! ```
//!
//! # High-Level API
//!
//! ```ignore
//! use shrinkfs::log::TracingLogger;
//! use shrinkfs::service::{ServiceConfig, ShrinkService};
//! use std::sync::Arc;
//!
//! let config = ServiceConfig::builder().source("/photos").build()?;
//! let service = ShrinkService::new(config, Arc::new(TracingLogger));
//! service.serve("/mnt/photos-small".as_ref())?;
//! ```

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod fuse;
pub mod log;
pub mod logging;
pub mod panic;
pub mod scan;
pub mod service;
pub mod tree;

/// Version of the shrinkfs library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
