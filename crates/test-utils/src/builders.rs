use std::path::{Path, PathBuf};

use livefire::config::{ConfigFile, RawConfigFile};
use livefire::types::InitialClock;
use livefire::watch::RawEvent;
use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn file(mut self, path: &str) -> Self {
        self.config.watch.files.push(path.to_string());
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch.debounce_ms = ms;
        self
    }

    pub fn event_buffer(mut self, n: usize) -> Self {
        self.config.watch.event_buffer = n;
        self
    }

    pub fn initial_clock(mut self, clock: InitialClock) -> Self {
        self.config.coordinator.initial_clock = clock;
        self
    }

    pub fn wait_queue(mut self, n: usize) -> Self {
        self.config.coordinator.wait_queue = n;
        self
    }

    pub fn max_pending(mut self, n: usize) -> Self {
        self.config.coordinator.max_pending = n;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn event(kind: EventKind, paths: &[&Path]) -> RawEvent {
    Ok(paths
        .iter()
        .fold(Event::new(kind), |e, p| e.add_path(p.to_path_buf())))
}

/// Content write on `path`, as inotify reports it.
pub fn modified(path: impl AsRef<Path>) -> RawEvent {
    event(
        EventKind::Modify(ModifyKind::Data(DataChange::Any)),
        &[path.as_ref()],
    )
}

pub fn created(path: impl AsRef<Path>) -> RawEvent {
    event(EventKind::Create(CreateKind::File), &[path.as_ref()])
}

pub fn removed(path: impl AsRef<Path>) -> RawEvent {
    event(EventKind::Remove(RemoveKind::File), &[path.as_ref()])
}

/// `from` renamed over `to` in one event.
pub fn renamed(from: impl AsRef<Path>, to: impl AsRef<Path>) -> RawEvent {
    event(
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
        &[from.as_ref(), to.as_ref()],
    )
}

/// Error the OS layer may report after startup.
pub fn os_error(msg: &str) -> RawEvent {
    Err(notify::Error::generic(msg))
}

pub fn abs(path: &str) -> PathBuf {
    PathBuf::from(path)
}
