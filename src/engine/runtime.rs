// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::ClockSource;
use super::core::BroadcastCore;
use super::ticket::{Ticket, TicketId};
use super::{ClockSnapshot, CoordinatorEvent, CoordinatorOptions, Timestamp};
use crate::errors::WaitError;
use crate::types::InitialClock;
use crate::watch::ChangeStream;

/// The single task that owns the clock and the parked waiters.
///
/// Multiplexes the change stream and the request queue and feeds each item,
/// one at a time, into [`BroadcastCore`]. Nothing else can reach the core.
pub struct CoordinatorRuntime<C: ClockSource> {
    core: BroadcastCore,
    changes: ChangeStream,
    requests: mpsc::Receiver<CoordinatorEvent>,
    clock: C,
}

impl<C: ClockSource> fmt::Debug for CoordinatorRuntime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorRuntime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<C: ClockSource> CoordinatorRuntime<C> {
    pub fn new(
        core: BroadcastCore,
        changes: ChangeStream,
        requests: mpsc::Receiver<CoordinatorEvent>,
        clock: C,
    ) -> Self {
        Self {
            core,
            changes,
            requests,
            clock,
        }
    }

    /// Main loop.
    ///
    /// Runs until shutdown is requested or every [`Coordinator`] handle is
    /// gone. If the change stream ends first, waits are still served; parked
    /// waiters then stay parked until shutdown.
    pub async fn run(mut self) {
        info!(last_changed = self.core.last_changed(), "coordinator started");

        let mut changes_open = true;

        loop {
            let event = tokio::select! {
                change = self.changes.recv(), if changes_open => match change {
                    Some(path) => {
                        let at = self.clock.now();
                        debug!(?path, at, "change received");
                        CoordinatorEvent::Changed { at }
                    }
                    None => {
                        warn!("change stream closed; no further releases will happen");
                        changes_open = false;
                        continue;
                    }
                },
                request = self.requests.recv() => match request {
                    Some(event) => event,
                    None => {
                        info!("all coordinator handles dropped");
                        break;
                    }
                },
            };

            let step = self.core.step(event);

            if !step.keep_running {
                info!("shutdown requested");
                break;
            }
        }

        info!(
            last_changed = self.core.last_changed(),
            "coordinator stopped"
        );
    }
}

/// Start the coordinator task over a change stream.
///
/// Returns the handle callers wait through, and the task itself.
pub fn spawn_coordinator<C: ClockSource>(
    changes: ChangeStream,
    clock: C,
    options: CoordinatorOptions,
) -> (Coordinator, JoinHandle<()>) {
    let initial = match options.initial_clock {
        InitialClock::Now => clock.now(),
        InitialClock::Zero => 0,
    };

    let (tx, rx) = mpsc::channel(options.wait_queue.max(1));
    let core = BroadcastCore::new(initial, options.max_pending);
    let runtime = CoordinatorRuntime::new(core, changes, rx, clock);
    let task = tokio::spawn(runtime.run());

    (Coordinator::new(tx), task)
}

/// Cloneable handle to a running coordinator.
#[derive(Debug, Clone)]
pub struct Coordinator {
    tx: mpsc::Sender<CoordinatorEvent>,
    next_id: Arc<AtomicU64>,
}

impl Coordinator {
    fn new(tx: mpsc::Sender<CoordinatorEvent>) -> Self {
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Wait for the first change newer than `baseline`.
    ///
    /// Returns the current clock at once if `baseline` is already older than
    /// it. Otherwise parks until the next change and returns its timestamp.
    ///
    /// A full request queue delays registration rather than failing it; the
    /// loop never blocks, so it always drains. `Overloaded` only comes from
    /// the parked-waiter cap.
    ///
    /// Dropping the returned future withdraws the waiter.
    pub async fn wait(&self, baseline: Timestamp) -> Result<Timestamp, WaitError> {
        let id = TicketId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (ticket, reply_rx) = Ticket::new(id, baseline);

        // Not queued if dropped here, so there is nothing to cancel yet.
        self.tx
            .send(CoordinatorEvent::Wait(ticket))
            .await
            .map_err(|_| WaitError::TurnedAway)?;

        let mut guard = CancelOnDrop {
            id,
            tx: self.tx.clone(),
            armed: true,
        };
        let reply = reply_rx.await;
        guard.armed = false;

        // Sender dropped without a reply: the coordinator went away.
        reply.unwrap_or(Err(WaitError::TurnedAway))
    }

    /// Like [`Coordinator::wait`], giving up after `limit`.
    ///
    /// `Ok(None)` means the deadline passed first; the waiter is withdrawn.
    pub async fn wait_timeout(
        &self,
        baseline: Timestamp,
        limit: Duration,
    ) -> Result<Option<Timestamp>, WaitError> {
        match tokio::time::timeout(limit, self.wait(baseline)).await {
            Ok(reply) => reply.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }

    /// Current clock and number of parked waiters.
    pub async fn snapshot(&self) -> Result<ClockSnapshot, WaitError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(CoordinatorEvent::Snapshot(tx))
            .await
            .map_err(|_| WaitError::TurnedAway)?;
        rx.await.map_err(|_| WaitError::TurnedAway)
    }

    /// Time of the most recent change; a fresh page's first baseline.
    pub async fn now(&self) -> Result<Timestamp, WaitError> {
        Ok(self.snapshot().await?.last_changed)
    }

    /// Turn every parked waiter away and stop the loop.
    pub async fn shutdown(&self) {
        if self.tx.send(CoordinatorEvent::Shutdown).await.is_err() {
            debug!("coordinator already stopped");
        }
    }
}

/// Withdraws a parked ticket if its `wait` future is dropped early.
struct CancelOnDrop {
    id: TicketId,
    tx: mpsc::Sender<CoordinatorEvent>,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // If the queue is full the ticket is pruned on a later park instead.
        if self.tx.try_send(CoordinatorEvent::Cancel(self.id)).is_err() {
            debug!(ticket = %self.id, "could not queue cancellation");
        }
    }
}
