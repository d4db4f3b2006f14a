// src/engine/ticket.rs

use std::fmt;

use tokio::sync::oneshot;

use super::Timestamp;
use crate::errors::WaitError;

/// What a waiter eventually receives.
pub type Reply = Result<Timestamp, WaitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parked long-poll request: "tell me about the first change after
/// `baseline`".
///
/// Resolving consumes the ticket, so at most one reply is ever sent.
#[derive(Debug)]
pub struct Ticket {
    id: TicketId,
    baseline: Timestamp,
    reply: oneshot::Sender<Reply>,
}

impl Ticket {
    pub fn new(id: TicketId, baseline: Timestamp) -> (Self, oneshot::Receiver<Reply>) {
        let (reply, rx) = oneshot::channel();
        (
            Self {
                id,
                baseline,
                reply,
            },
            rx,
        )
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn baseline(&self) -> Timestamp {
        self.baseline
    }

    /// The waiter has gone away; nobody will read the reply.
    pub fn is_abandoned(&self) -> bool {
        self.reply.is_closed()
    }

    /// Deliver the reply. Returns `false` if the waiter was already gone.
    pub fn resolve(self, reply: Reply) -> bool {
        self.reply.send(reply).is_ok()
    }
}
