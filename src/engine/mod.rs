// src/engine/mod.rs

//! The broadcast coordinator.
//!
//! Turns the stalker's change stream into a monotonic clock and answers
//! long-poll waiters:
//! - a waiter whose baseline is already older than the clock is answered at
//!   once with the current value;
//! - everyone else parks until the next change, and all of them are released
//!   together with the same new timestamp.
//!
//! The state machine lives in [`core`] and has no channels or Tokio types.
//! [`runtime`] is the single task that owns it and the only place its state
//! is touched; callers talk to it through the cloneable [`Coordinator`].

use tokio::sync::oneshot;

use crate::types::InitialClock;

/// Whole seconds since the Unix epoch.
pub type Timestamp = u64;

pub const DEFAULT_WAIT_QUEUE: usize = 256;
pub const DEFAULT_MAX_PENDING: usize = 4096;

/// Point-in-time view of the coordinator, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub last_changed: Timestamp,
    pub pending: usize,
}

/// Everything the coordinator loop reacts to, in arrival order.
#[derive(Debug)]
pub enum CoordinatorEvent {
    /// A watched target changed at `at`.
    Changed { at: Timestamp },
    /// Park (or immediately answer) a waiter.
    Wait(Ticket),
    /// The waiter behind this ticket gave up.
    Cancel(TicketId),
    /// Report the current state.
    Snapshot(oneshot::Sender<ClockSnapshot>),
    /// Turn every waiter away and stop.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub initial_clock: InitialClock,
    /// Capacity of the request queue. Callers wait for room when it is full.
    pub wait_queue: usize,
    /// Most tickets parked at once.
    pub max_pending: usize,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            initial_clock: InitialClock::default(),
            wait_queue: DEFAULT_WAIT_QUEUE,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

pub mod clock;
pub mod core;
pub mod runtime;
pub mod ticket;

pub use self::clock::{ClockSource, ManualClock, SystemClock};
pub use self::core::{BroadcastCore, CoreStep};
pub use self::runtime::{spawn_coordinator, Coordinator, CoordinatorRuntime};
pub use self::ticket::{Reply, Ticket, TicketId};
