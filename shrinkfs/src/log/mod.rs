//! Logging abstraction used by the build pipeline and the FUSE layer.
//!
//! Components receive an `Arc<dyn Logger>` instead of calling `tracing`
//! directly, so the scanner, dispatcher and cache can be exercised in tests
//! with a silent or recording logger.
//!
//! - [`Logger`]: the interface components log through
//! - [`TracingLogger`]: production adapter that forwards to `tracing`
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: keeps records in memory for assertions
//!
//! ```
//! use shrinkfs::log::{Logger, NoOpLogger};
//! use shrinkfs::log_info;
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "scanning {}", "/photos");
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
