// src/errors.rs

//! Crate-wide error types.
//!
//! Component errors are small enums so callers can match on them.
//! [`LivefireError`] covers loading the configuration; the binary folds
//! everything into `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while bringing up the path stalker.
///
/// Any of these aborts startup: a silently unwatched target would report
/// "nothing changed" forever.
#[derive(Error, Debug)]
pub enum WatchSetupError {
    #[error("failed to initialise filesystem notifications: {0}")]
    Init(#[source] notify::Error),

    #[error("cannot resolve watch target {path:?}: {reason}")]
    Resolve { path: PathBuf, reason: String },

    #[error("failed to watch {path:?}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Error reported by the OS notification layer after startup.
///
/// Logged and absorbed; never ends the change stream.
#[derive(Error, Debug)]
#[error("filesystem monitor error: {0}")]
pub struct TransientWatchError(#[from] pub notify::Error);

/// Why a `wait` call returned without a timestamp.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    #[error("turned away while waiting")]
    TurnedAway,

    #[error("coordinator is overloaded; too many waiters")]
    Overloaded,
}

/// Rejected `?t=` query value. Produced for the HTTP layer, never by `wait`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBaseline {
    #[error(r#"expected unix epoch of last update as "t""#)]
    Missing,

    #[error("invalid baseline {value:?}: {reason}")]
    Malformed { value: String, reason: String },
}

#[derive(Error, Debug)]
pub enum LivefireError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LivefireError>;
