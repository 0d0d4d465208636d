//! INI parsing: the single place where key names map to struct fields.

use super::defaults::clamp_workers;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::dispatch::FailurePolicy;
use ini::Ini;
use std::path::PathBuf;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [dispatch] section
    if let Some(section) = ini.section(Some("dispatch")) {
        if let Some(v) = section.get("workers") {
            let workers = parse_count("dispatch", "workers", v)?;
            config.dispatch.workers = clamp_workers("workers", workers);
        }
        if let Some(v) = section.get("queue_capacity") {
            let capacity = parse_count("dispatch", "queue_capacity", v)?;
            config.dispatch.queue_capacity = Some(clamp_workers("queue_capacity", capacity));
        }
    }

    // [scan] section
    if let Some(section) = ini.section(Some("scan")) {
        if let Some(v) = section.get("follow_links") {
            config.scan.follow_links = parse_bool(v);
        }
    }

    // [transcode] section
    if let Some(section) = ini.section(Some("transcode")) {
        if let Some(v) = section.get("on_failure") {
            config.transcode.on_failure = v.parse::<FailurePolicy>().map_err(|_| {
                ConfigFileError::InvalidValue {
                    section: "transcode".to_string(),
                    key: "on_failure".to_string(),
                    value: v.to_string(),
                    reason: "must be 'omit' or 'passthrough'".to_string(),
                }
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_count(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative integer".to_string(),
        })
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
