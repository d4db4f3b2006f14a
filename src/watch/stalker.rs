// src/watch/stalker.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, trace, warn};

use crate::errors::{TransientWatchError, WatchSetupError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::backend::{NotifyBackend, RawEvent, WatchBackend};
use crate::watch::event::ChangeEvent;
use crate::watch::path_utils::resolve_target;
use crate::watch::registry::WatchRegistry;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);
pub const DEFAULT_EVENT_BUFFER: usize = 32;

/// Tuning knobs for the stalker's output side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalkerOptions {
    /// How long to keep collecting raw events after the first one before
    /// emitting. Zero only drains what is already queued.
    pub debounce: Duration,
    /// Capacity of the change stream.
    pub event_buffer: usize,
}

impl Default for StalkerOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Synchronous heart of the stalker: registry plus backend.
///
/// Knows nothing about channels or time; the async loop feeds it batches.
#[derive(Debug)]
pub struct StalkerCore<B: WatchBackend> {
    registry: WatchRegistry,
    backend: B,
}

impl<B: WatchBackend> StalkerCore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            registry: WatchRegistry::new(),
            backend,
        }
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Subscribe to every target and its ancestor chain.
    ///
    /// Stops at the first failed subscription; the caller must discard the
    /// core in that case, partial watch sets are not supported.
    pub fn register_all(&mut self, targets: &[PathBuf]) -> Result<(), WatchSetupError> {
        for target in targets {
            for path in self.registry.register_target(target) {
                debug!(?path, requested = self.registry.is_requested(&path), "subscribing");
                self.backend
                    .watch(&path)
                    .map_err(|source| WatchSetupError::Register {
                        path: path.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Filter one batch of raw changes down to requested paths.
    ///
    /// Each requested path appears at most once, in first-seen order.
    /// Registered paths that received a new file identity are re-subscribed.
    pub fn process_batch<I>(&mut self, events: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = ChangeEvent>,
    {
        let mut emitted: Vec<PathBuf> = Vec::new();

        for event in events {
            let Some(requested) = self.registry.lookup(&event.path) else {
                trace!(path = ?event.path, "ignoring change on unwatched path");
                continue;
            };

            if event.kind.replaces_identity() {
                debug!(path = ?event.path, kind = ?event.kind, "re-subscribing replaced path");
                if let Err(err) = self.backend.watch(&event.path) {
                    warn!(path = ?event.path, "{}", TransientWatchError(err));
                }
            }

            if requested && !emitted.contains(&event.path) {
                emitted.push(event.path);
            }
        }

        emitted
    }
}

/// Deduplicated stream of changed target paths.
///
/// Dropping it stops the stalker task and releases the OS watcher.
#[derive(Debug)]
pub struct ChangeStream {
    rx: mpsc::Receiver<PathBuf>,
}

impl ChangeStream {
    /// Wrap an existing channel, e.g. to drive the coordinator by hand.
    pub fn from_receiver(rx: mpsc::Receiver<PathBuf>) -> Self {
        Self { rx }
    }

    /// Next changed path; `None` once the stalker has stopped.
    pub async fn recv(&mut self) -> Option<PathBuf> {
        self.rx.recv().await
    }
}

/// Resolve caller-supplied paths into absolute watch targets.
pub fn resolve_targets<P: AsRef<Path>>(
    fs: &dyn FileSystem,
    paths: &[P],
) -> Result<Vec<PathBuf>, WatchSetupError> {
    paths
        .iter()
        .map(|p| resolve_target(fs, p.as_ref()))
        .collect()
}

/// Start stalking `paths` with the platform's notification backend.
///
/// Must be called from within a Tokio runtime.
pub fn start_watching<P: AsRef<Path>>(
    paths: &[P],
    options: StalkerOptions,
) -> Result<ChangeStream, WatchSetupError> {
    let targets = resolve_targets(&RealFileSystem, paths)?;

    let (raw_tx, raw_rx) = mpsc::unbounded_channel::<RawEvent>();
    let backend = NotifyBackend::new(raw_tx)?;

    // On error the core, and with it the OS watcher, is dropped here.
    let mut core = StalkerCore::new(backend);
    core.register_all(&targets)?;

    info!(
        targets = targets.len(),
        subscriptions = core.registry().subscription_count(),
        "path stalker started"
    );

    Ok(spawn_stalker(core, raw_rx, options))
}

/// Run an already registered core on its own task.
pub fn spawn_stalker<B>(
    core: StalkerCore<B>,
    raw_rx: mpsc::UnboundedReceiver<RawEvent>,
    options: StalkerOptions,
) -> ChangeStream
where
    B: WatchBackend + 'static,
{
    let (out_tx, out_rx) = mpsc::channel(options.event_buffer.max(1));
    tokio::spawn(run_stalker(core, raw_rx, out_tx, options.debounce));
    ChangeStream::from_receiver(out_rx)
}

async fn run_stalker<B: WatchBackend>(
    mut core: StalkerCore<B>,
    mut raw_rx: mpsc::UnboundedReceiver<RawEvent>,
    out_tx: mpsc::Sender<PathBuf>,
    debounce: Duration,
) {
    loop {
        let first = tokio::select! {
            _ = out_tx.closed() => {
                debug!("change stream dropped");
                break;
            }
            msg = raw_rx.recv() => match msg {
                Some(m) => m,
                None => break,
            },
        };

        let mut batch = Vec::new();
        absorb(first, &mut batch);

        if debounce.is_zero() {
            while let Ok(msg) = raw_rx.try_recv() {
                absorb(msg, &mut batch);
            }
        } else {
            let deadline = Instant::now() + debounce;
            while let Ok(Some(msg)) = timeout_at(deadline, raw_rx.recv()).await {
                absorb(msg, &mut batch);
            }
        }

        for path in core.process_batch(batch) {
            debug!(?path, "target changed");
            match out_tx.try_send(path) {
                Ok(()) => {}
                // Queued changes already guarantee a release downstream.
                Err(TrySendError::Full(path)) => {
                    debug!(?path, "change stream full; coalescing with queued changes");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("change stream dropped");
                    break;
                }
            }
        }
    }

    info!("path stalker stopped");
}

fn absorb(msg: RawEvent, batch: &mut Vec<ChangeEvent>) {
    match msg {
        Ok(event) => batch.extend(ChangeEvent::from_notify(&event)),
        Err(err) => warn!("{}", TransientWatchError(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::event::ChangeKind;
    use crate::watch::mock::MockBackend;

    fn core_for(targets: &[&str]) -> (StalkerCore<MockBackend>, MockBackend) {
        let spy = MockBackend::new();
        let mut core = StalkerCore::new(spy.clone());
        let targets: Vec<PathBuf> = targets.iter().map(PathBuf::from).collect();
        core.register_all(&targets).unwrap();
        (core, spy)
    }

    #[test]
    fn siblings_share_one_parent_subscription() {
        let (_core, spy) = core_for(&["/srv/site/body.html", "/srv/site/style.css"]);

        assert_eq!(spy.count_for(Path::new("/srv/site")), 1);
        assert_eq!(spy.count_for(Path::new("/srv")), 1);
        assert_eq!(spy.count_for(Path::new("/")), 0);
        assert_eq!(spy.calls().len(), 4);
    }

    #[test]
    fn startup_failure_is_fatal() {
        let spy = MockBackend::new();
        spy.fail_on("/srv/site");
        let mut core = StalkerCore::new(spy.clone());

        let err = core
            .register_all(&[PathBuf::from("/srv/site/body.html"), PathBuf::from("/srv/x.css")])
            .unwrap_err();

        match err {
            WatchSetupError::Register { path, .. } => assert_eq!(path, PathBuf::from("/srv/site")),
            other => panic!("expected Register error, got {other:?}"),
        }
        // Nothing after the failure is attempted.
        assert!(!spy.calls().contains(&PathBuf::from("/srv/x.css")));
    }

    #[test]
    fn only_requested_paths_are_emitted() {
        let (mut core, _spy) = core_for(&["/srv/site/body.html"]);

        let out = core.process_batch(vec![
            ChangeEvent::new("/srv/site", ChangeKind::Modified),
            ChangeEvent::new("/srv/site/other.html", ChangeKind::Modified),
            ChangeEvent::new("/etc/passwd", ChangeKind::Modified),
            ChangeEvent::new("/srv/site/body.html", ChangeKind::Modified),
        ]);

        assert_eq!(out, vec![PathBuf::from("/srv/site/body.html")]);
    }

    #[test]
    fn atomic_replace_emits_once_and_resubscribes() {
        let (mut core, spy) = core_for(&["/srv/site/body.html"]);
        let target = Path::new("/srv/site/body.html");

        let out = core.process_batch(vec![
            ChangeEvent::new("/srv/site/.body.html.swp", ChangeKind::Created),
            ChangeEvent::new(target, ChangeKind::Removed),
            ChangeEvent::new(target, ChangeKind::Created),
        ]);

        assert_eq!(out, vec![target.to_path_buf()]);
        assert_eq!(spy.count_for(target), 2);
        // Temp files are never subscribed.
        assert_eq!(spy.count_for(Path::new("/srv/site/.body.html.swp")), 0);

        let out = core.process_batch(vec![ChangeEvent::new(target, ChangeKind::Modified)]);
        assert_eq!(out, vec![target.to_path_buf()]);
    }

    #[test]
    fn recreated_ancestor_is_resubscribed_but_not_emitted() {
        let (mut core, spy) = core_for(&["/srv/site/body.html"]);

        let out = core.process_batch(vec![ChangeEvent::new("/srv/site", ChangeKind::Created)]);

        assert!(out.is_empty());
        assert_eq!(spy.count_for(Path::new("/srv/site")), 2);
    }

    #[test]
    fn failed_resubscription_still_emits() {
        let (mut core, spy) = core_for(&["/srv/site/body.html"]);
        spy.fail_on("/srv/site/body.html");

        let out = core.process_batch(vec![ChangeEvent::new(
            "/srv/site/body.html",
            ChangeKind::Renamed,
        )]);

        assert_eq!(out, vec![PathBuf::from("/srv/site/body.html")]);
    }
}
