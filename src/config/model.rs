// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::{CoordinatorOptions, DEFAULT_MAX_PENDING, DEFAULT_WAIT_QUEUE};
use crate::types::InitialClock;
use crate::watch::StalkerOptions;
use crate::watch::stalker::DEFAULT_EVENT_BUFFER;

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// files = ["index.html", "style.css"]
/// debounce_ms = 50
/// event_buffer = 32
///
/// [coordinator]
/// initial_clock = "now"
/// wait_queue = 256
/// max_pending = 4096
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub coordinator: CoordinatorSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Files to watch, absolute or relative to the working directory.
    #[serde(default)]
    pub files: Vec<String>,

    /// Milliseconds to gather raw events into one batch. 0 disables it.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Capacity of the change stream.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_debounce_ms() -> u64 {
    50
}

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            debounce_ms: default_debounce_ms(),
            event_buffer: default_event_buffer(),
        }
    }
}

/// `[coordinator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorSection {
    #[serde(default)]
    pub initial_clock: InitialClock,

    /// Capacity of the wait registration queue.
    #[serde(default = "default_wait_queue")]
    pub wait_queue: usize,

    /// Most waiters parked at once.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_wait_queue() -> usize {
    DEFAULT_WAIT_QUEUE
}

fn default_max_pending() -> usize {
    DEFAULT_MAX_PENDING
}

impl Default for CoordinatorSection {
    fn default() -> Self {
        Self {
            initial_clock: InitialClock::default(),
            wait_queue: default_wait_queue(),
            max_pending: default_max_pending(),
        }
    }
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    coordinator: CoordinatorSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, coordinator: CoordinatorSection) -> Self {
        Self { watch, coordinator }
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.watch.files.iter().map(PathBuf::from).collect()
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn coordinator(&self) -> &CoordinatorSection {
        &self.coordinator
    }

    pub fn stalker_options(&self) -> StalkerOptions {
        StalkerOptions {
            debounce: Duration::from_millis(self.watch.debounce_ms),
            event_buffer: self.watch.event_buffer,
        }
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            initial_clock: self.coordinator.initial_clock,
            wait_queue: self.coordinator.wait_queue,
            max_pending: self.coordinator.max_pending,
        }
    }
}
