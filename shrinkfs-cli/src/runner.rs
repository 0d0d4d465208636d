//! CLI runner: config loading, logging setup and service creation.

use crate::error::CliError;
use shrinkfs::config::{config_file_path, ConfigFile};
use shrinkfs::log::TracingLogger;
use shrinkfs::logging::{init_logging, LoggingGuard};
use shrinkfs::service::{ServiceConfigBuilder, ShrinkService};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Owns the loaded configuration and keeps logging alive while it exists.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load `config_path` (or the default config file) and start logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        if config_path.is_none() && !config_file_path().exists() {
            info!("No config file at {}, using defaults", config_file_path().display());
        }

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn log_startup(&self, source: &Path, mountpoint: &Path) {
        info!("shrinkfs v{}", shrinkfs::VERSION);
        info!("Mirroring {} at {}", source.display(), mountpoint.display());
    }

    /// A service builder seeded from the config file.
    pub fn service_config_builder(&self) -> ServiceConfigBuilder {
        ServiceConfigBuilder::from_config_file(&self.config)
    }

    pub fn create_service(&self, builder: ServiceConfigBuilder) -> Result<ShrinkService, CliError> {
        let config = builder.build().map_err(CliError::Service)?;
        let logger = Arc::new(TracingLogger);
        Ok(ShrinkService::new(config, logger))
    }
}
