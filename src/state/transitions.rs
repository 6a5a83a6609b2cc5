//! Transition detection between successive order snapshots.
//!
//! Pure functions: the detector reads the previous cycle's [`StatusHistory`]
//! and the fresh active-order list, and classifies each order as unchanged,
//! newly finished (observed terminal transition), or vanished while active
//! (implicit finish). No hidden state: running the detector twice on the
//! same inputs yields the same candidates.
//!
//! # Vanished Means Finished
//!
//! The active-orders endpoint has no cancellation signal: the only way an
//! order leaves the active list is completion (or a cancellation this surface
//! cannot distinguish from completion). A cancelled order would therefore
//! incorrectly become a feedback candidate. Known backend limitation; the
//! eligibility filter still guarantees at most one prompt either way.

use crate::types::{Order, OrderId, OrderStatus};

use super::StatusHistory;

/// Why an order became a feedback candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerReason {
    /// A non-terminal → terminal status change was observed directly.
    StatusTransition,
    /// The order left the active list without an observed terminal status.
    Vanished,
    /// The order sat in `ready` past the fallback delay.
    TimeBased,
}

/// A candidate for a feedback prompt, produced fresh each poll cycle.
///
/// Vanished candidates carry no [`Order`]: the order is no longer in the
/// active list, so only its id and last known status are available. Order
/// details are resolved against the recently-finished list before display;
/// candidates that cannot be resolved are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerCandidate {
    /// The order this candidate refers to.
    pub order_id: OrderId,
    /// Which signal produced the candidate.
    pub reason: TriggerReason,
    /// Full order details, when the producing signal had them.
    pub order: Option<Order>,
    /// The status observed when the candidate was produced (for vanished
    /// candidates, the last status seen before disappearance).
    pub last_status: OrderStatus,
}

impl TriggerCandidate {
    /// Candidate from a directly observed terminal transition.
    pub fn status_transition(order: Order) -> Self {
        TriggerCandidate {
            order_id: order.id,
            reason: TriggerReason::StatusTransition,
            last_status: order.status,
            order: Some(order),
        }
    }

    /// Candidate from a disappearance; only the id and last status survive.
    pub fn vanished(order_id: OrderId, last_status: OrderStatus) -> Self {
        TriggerCandidate {
            order_id,
            reason: TriggerReason::Vanished,
            order: None,
            last_status,
        }
    }

    /// Candidate from the ready-timer fallback.
    pub fn time_based(order: Order) -> Self {
        TriggerCandidate {
            order_id: order.id,
            reason: TriggerReason::TimeBased,
            last_status: order.status,
            order: Some(order),
        }
    }
}

/// Compares a fresh snapshot against the previous history.
///
/// Emits:
/// - a `StatusTransition` candidate for each order whose previous status was
///   known and non-terminal and whose new status is terminal, in the order
///   orders appear in `current`;
/// - a `Vanished` candidate for each id the history marks non-terminal that
///   is absent from `current`, in arbitrary order after the transitions.
///
/// Callers must not depend on relative ordering across the two categories.
/// Orders appearing for the first time already in a terminal state produce
/// nothing: there was no observed transition, and the reconciliation path
/// covers finishes this client was not running to see.
pub fn detect_transitions(previous: &StatusHistory, current: &[Order]) -> Vec<TriggerCandidate> {
    let mut candidates = Vec::new();

    for order in current {
        if let Some(prev_status) = previous.status_of(order.id)
            && !prev_status.is_terminal()
            && order.status.is_terminal()
        {
            candidates.push(TriggerCandidate::status_transition(order.clone()));
        }
    }

    for (id, prev_status) in previous.iter() {
        if !prev_status.is_terminal() && !current.iter().any(|o| o.id == id) {
            candidates.push(TriggerCandidate::vanished(id, prev_status));
        }
    }

    candidates
}
