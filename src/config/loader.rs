// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] or
/// [`load_for_cli`] to get a checked [`ConfigFile`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for a CLI invocation.
///
/// - An explicit `--config` must exist and parse.
/// - Otherwise `Livefire.toml` is read if present, else defaults are used.
/// - Positional files are appended to `[watch].files`; flags override keys.
pub fn load_for_cli(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!(?path, "using default config file");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    apply_cli_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    raw.watch.files.extend(args.files.iter().cloned());
    if let Some(ms) = args.debounce_ms {
        raw.watch.debounce_ms = ms;
    }
    if let Some(clock) = args.initial_clock {
        raw.coordinator.initial_clock = clock;
    }
}

/// Config file looked up when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Livefire.toml")
}
