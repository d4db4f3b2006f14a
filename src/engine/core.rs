// src/engine/core.rs

//! Pure coordinator state machine.
//!
//! Consumes [`CoordinatorEvent`]s one at a time and answers tickets through
//! their oneshot senders, which never block. Everything else (reading
//! channels, asking the clock) is the runtime's job, so this can be unit
//! tested without a Tokio runtime.

use tracing::{debug, warn};

use crate::engine::ticket::{Ticket, TicketId};
use crate::engine::{ClockSnapshot, CoordinatorEvent, Timestamp};
use crate::errors::WaitError;

/// Outcome of handling a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreStep {
    /// Waiters answered by a change in this step.
    pub released: usize,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(released: usize) -> Self {
        Self {
            released,
            keep_running: true,
        }
    }
}

/// Clock plus the parked waiters.
///
/// Invariants:
/// - `last_changed` never decreases;
/// - every parked ticket had `baseline >= last_changed` when it was parked;
/// - a change that moves the clock empties `pending` in the same step.
#[derive(Debug)]
pub struct BroadcastCore {
    last_changed: Timestamp,
    pending: Vec<Ticket>,
    max_pending: usize,
}

impl BroadcastCore {
    pub fn new(initial: Timestamp, max_pending: usize) -> Self {
        Self {
            last_changed: initial,
            pending: Vec::new(),
            max_pending: max_pending.max(1),
        }
    }

    pub fn last_changed(&self) -> Timestamp {
        self.last_changed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            last_changed: self.last_changed,
            pending: self.pending.len(),
        }
    }

    /// Handle one event.
    pub fn step(&mut self, event: CoordinatorEvent) -> CoreStep {
        match event {
            CoordinatorEvent::Changed { at } => CoreStep::running(self.on_change(at)),
            CoordinatorEvent::Wait(ticket) => {
                self.on_wait(ticket);
                CoreStep::running(0)
            }
            CoordinatorEvent::Cancel(id) => {
                self.on_cancel(id);
                CoreStep::running(0)
            }
            CoordinatorEvent::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
                CoreStep::running(0)
            }
            CoordinatorEvent::Shutdown => {
                self.turn_away_all();
                CoreStep {
                    released: 0,
                    keep_running: false,
                }
            }
        }
    }

    /// Advance the clock and release everyone parked.
    ///
    /// A change stamped earlier than the clock is ignored outright, both for
    /// the clock and for releasing. One stamped at the same second still
    /// releases.
    fn on_change(&mut self, at: Timestamp) -> usize {
        if at < self.last_changed {
            debug!(at, last_changed = self.last_changed, "ignoring change older than clock");
            return 0;
        }

        self.last_changed = at;

        let mut released = 0;
        for ticket in self.pending.drain(..) {
            if ticket.resolve(Ok(at)) {
                released += 1;
            }
        }

        debug!(at, released, "clock advanced");
        released
    }

    fn on_wait(&mut self, ticket: Ticket) {
        if ticket.baseline() < self.last_changed {
            let id = ticket.id();
            ticket.resolve(Ok(self.last_changed));
            debug!(ticket = %id, last_changed = self.last_changed, "baseline stale; answered at once");
            return;
        }

        self.pending.retain(|t| !t.is_abandoned());

        if self.pending.len() >= self.max_pending {
            warn!(
                ticket = %ticket.id(),
                max_pending = self.max_pending,
                "too many parked waiters; turning one away"
            );
            ticket.resolve(Err(WaitError::Overloaded));
            return;
        }

        debug!(ticket = %ticket.id(), baseline = ticket.baseline(), "parked");
        self.pending.push(ticket);
    }

    fn on_cancel(&mut self, id: TicketId) {
        let before = self.pending.len();
        self.pending.retain(|t| t.id() != id);
        if self.pending.len() != before {
            debug!(ticket = %id, "cancelled");
        }
    }

    fn turn_away_all(&mut self) {
        let count = self.pending.len();
        for ticket in self.pending.drain(..) {
            ticket.resolve(Err(WaitError::TurnedAway));
        }
        debug!(count, "turned away parked waiters");
    }
}
