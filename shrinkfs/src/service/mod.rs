//! High-level service facade: configuration in, mounted filesystem out.
//!
//! # Example
//!
//! ```ignore
//! use shrinkfs::log::TracingLogger;
//! use shrinkfs::service::{ServiceConfig, ShrinkService};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = ServiceConfig::builder()
//!     .source("/photos")
//!     .cache_directory("/var/cache/shrinkfs")
//!     .build()?;
//!
//! let service = ShrinkService::new(config, Arc::new(TracingLogger));
//! // Blocks until the mount is released.
//! service.serve(Path::new("/mnt/small"))?;
//! ```

mod config;
mod error;
mod facade;
mod mount;

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::ServiceError;
pub use facade::ShrinkService;
pub use mount::{MountConfig, DEFAULT_SUBTYPE};
