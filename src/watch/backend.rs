// src/watch/backend.rs

use std::fmt;
use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::errors::WatchSetupError;

/// Raw notification as delivered by the OS layer.
pub type RawEvent = notify::Result<Event>;

/// Something that can subscribe to changes on a single path.
///
/// Subscriptions are non-recursive; the stalker decides which directories
/// need one.
pub trait WatchBackend: Send + fmt::Debug {
    fn watch(&mut self, path: &Path) -> notify::Result<()>;
}

/// Backend over the platform's recommended `notify` watcher.
///
/// Dropping it closes the OS handle and stops event delivery.
pub struct NotifyBackend {
    inner: RecommendedWatcher,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend").finish()
    }
}

impl NotifyBackend {
    /// Create the OS watcher, forwarding every notification into `raw_tx`.
    pub fn new(raw_tx: mpsc::UnboundedSender<RawEvent>) -> Result<Self, WatchSetupError> {
        // Called synchronously on notify's own thread.
        let inner = RecommendedWatcher::new(
            move |res: RawEvent| {
                // A closed receiver means the stalker is shutting down.
                let _ = raw_tx.send(res);
            },
            Config::default(),
        )
        .map_err(WatchSetupError::Init)?;

        Ok(Self { inner })
    }
}

impl WatchBackend for NotifyBackend {
    fn watch(&mut self, path: &Path) -> notify::Result<()> {
        self.inner.watch(path, RecursiveMode::NonRecursive)
    }
}
