// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LivefireError, Result};

/// Upper bound for `[watch].debounce_ms`; longer windows make reloads feel
/// broken.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LivefireError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.coordinator))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_files(cfg)?;
    validate_watch_section(cfg)?;
    validate_coordinator_section(cfg)?;
    Ok(())
}

fn ensure_has_files(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.files.is_empty() {
        return Err(LivefireError::ConfigError(
            "nothing to watch: list files on the command line or in [watch].files".to_string(),
        ));
    }
    if let Some(pos) = cfg.watch.files.iter().position(|f| f.trim().is_empty()) {
        return Err(LivefireError::ConfigError(format!(
            "[watch].files[{pos}] is empty"
        )));
    }
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.event_buffer == 0 {
        return Err(LivefireError::ConfigError(
            "[watch].event_buffer must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.watch.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(LivefireError::ConfigError(format!(
            "[watch].debounce_ms must be <= {MAX_DEBOUNCE_MS} (got {})",
            cfg.watch.debounce_ms
        )));
    }
    Ok(())
}

fn validate_coordinator_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.coordinator.wait_queue == 0 {
        return Err(LivefireError::ConfigError(
            "[coordinator].wait_queue must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.coordinator.max_pending == 0 {
        return Err(LivefireError::ConfigError(
            "[coordinator].max_pending must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
