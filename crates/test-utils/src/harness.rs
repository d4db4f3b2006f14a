use std::path::PathBuf;
use std::time::Duration;

use livefire::watch::mock::MockBackend;
use livefire::watch::{spawn_stalker, ChangeStream, RawEvent, StalkerCore, StalkerOptions};
use tokio::sync::mpsc;

/// A stalker running on its own task over a spy backend.
///
/// Tests push raw notifications through `raw` and read `stream`.
pub struct MockStalker {
    pub stream: ChangeStream,
    pub raw: mpsc::UnboundedSender<RawEvent>,
    pub backend: MockBackend,
}

impl MockStalker {
    /// Register `targets` and start the loop. Panics if registration fails.
    pub fn start(targets: &[&str], debounce: Duration) -> Self {
        let backend = MockBackend::new();
        let mut core = StalkerCore::new(backend.clone());
        let targets: Vec<PathBuf> = targets.iter().map(PathBuf::from).collect();
        core.register_all(&targets)
            .expect("mock registration should not fail");

        let (raw, raw_rx) = mpsc::unbounded_channel();
        let options = StalkerOptions {
            debounce,
            event_buffer: 32,
        };
        let stream = spawn_stalker(core, raw_rx, options);

        Self {
            stream,
            raw,
            backend,
        }
    }

    pub fn push(&self, event: RawEvent) {
        self.raw
            .send(event)
            .expect("stalker task should still be running");
    }
}
