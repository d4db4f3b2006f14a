// src/logging.rs

//! Logging setup for `livefire` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` CLI flag, applied to every target;
//! 2. `LIVEFIRE_LOG`, full `EnvFilter` syntax (e.g. `livefire=debug,notify=warn`);
//! 3. `info`.
//!
//! Logs go to stderr; stdout carries only the released timestamps.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "LIVEFIRE_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("{e}"))
        .context("installing tracing subscriber")
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level_directive(level)));
    }
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV_VAR} value {directives:?}")),
        None => Ok(EnvFilter::new("info")),
    }
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_env() {
        let filter = build_filter(Some(LogLevel::Trace), Some("error")).unwrap();
        assert_eq!(filter.to_string(), "trace");
    }

    #[test]
    fn env_directives_are_used_when_no_flag() {
        let filter = build_filter(None, Some("livefire=debug")).unwrap();
        assert_eq!(filter.to_string(), "livefire=debug");
    }

    #[test]
    fn blank_env_falls_back_to_info() {
        assert_eq!(build_filter(None, Some("  ")).unwrap().to_string(), "info");
        assert_eq!(build_filter(None, None).unwrap().to_string(), "info");
    }

    #[test]
    fn bad_env_is_reported() {
        assert!(build_filter(None, Some("livefire=loud")).is_err());
    }
}
