// tests/property/clock.rs

use proptest::prelude::*;
use tokio::sync::oneshot;

use livefire::engine::{BroadcastCore, CoordinatorEvent, Reply, Ticket, TicketId, Timestamp};

#[derive(Debug, Clone)]
enum Op {
    Change(Timestamp),
    Wait(Timestamp),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..10_000).prop_map(Op::Change),
        (0u64..10_000).prop_map(Op::Wait),
    ]
}

struct Waiter {
    baseline: Timestamp,
    clock_at_wait: Timestamp,
    rx: oneshot::Receiver<Reply>,
}

proptest! {
    #[test]
    fn clock_never_moves_backwards(
        initial in 0u64..5_000,
        ops in proptest::collection::vec(op_strategy(), 1..80),
    ) {
        let mut core = BroadcastCore::new(initial, 1_000);
        let mut previous = core.last_changed();
        let mut waiters = Vec::new();

        for (i, op) in ops.into_iter().enumerate() {
            match op {
                Op::Change(at) => {
                    core.step(CoordinatorEvent::Changed { at });
                }
                Op::Wait(baseline) => {
                    let clock_at_wait = core.last_changed();
                    let (ticket, rx) = Ticket::new(TicketId(i as u64), baseline);
                    core.step(CoordinatorEvent::Wait(ticket));
                    waiters.push(Waiter { baseline, clock_at_wait, rx });
                }
            }
            prop_assert!(core.last_changed() >= previous);
            previous = core.last_changed();
        }

        // Every answer is a clock value no older than the clock the waiter
        // saw, and stale waiters get exactly that clock.
        for mut w in waiters {
            if let Ok(reply) = w.rx.try_recv() {
                let t = reply.unwrap();
                prop_assert!(t >= w.clock_at_wait);
                if w.baseline < w.clock_at_wait {
                    prop_assert_eq!(t, w.clock_at_wait);
                }
            } else {
                prop_assert!(w.baseline >= w.clock_at_wait);
            }
        }
    }

    #[test]
    fn one_change_releases_every_parked_waiter(
        initial in 0u64..1_000,
        baselines in proptest::collection::vec(0u64..2_000, 1..40),
        bump in 0u64..500,
    ) {
        let mut core = BroadcastCore::new(initial, 1_000);
        let mut rxs = Vec::new();
        for (i, &b) in baselines.iter().enumerate() {
            let (ticket, rx) = Ticket::new(TicketId(i as u64), b);
            core.step(CoordinatorEvent::Wait(ticket));
            rxs.push((b, rx));
        }

        let parked = baselines.iter().filter(|&&b| b >= initial).count();
        prop_assert_eq!(core.pending_len(), parked);

        let at = initial + bump;
        let step = core.step(CoordinatorEvent::Changed { at });
        prop_assert_eq!(step.released, parked);
        prop_assert_eq!(core.pending_len(), 0);

        for (b, mut rx) in rxs {
            let expected = if b < initial { initial } else { at };
            prop_assert_eq!(rx.try_recv().unwrap(), Ok(expected));
        }
    }
}
