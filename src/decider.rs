//! The per-cycle feedback decision state machine.
//!
//! Each poll cycle the decider reduces the cycle's trigger candidates to at
//! most one actionable decision: nothing, a single feedback prompt, or a
//! multi-order selection. Between cycles it carries only the prompt pin;
//! everything else is recomputed from the snapshot and the persisted
//! eligibility set, which keeps the decider a pure function of its inputs
//! and independent of any rendering technology.
//!
//! # Phases
//!
//! `Idle -> Evaluating -> {NoAction, SinglePrompt, MultiSelect}` within a
//! cycle. A `SinglePrompt`/`MultiSelect` outcome pins the decider: later
//! cycles resolve to `NoAction` without evaluating, until the presentation
//! layer reports closure. With a single cooperative scheduler this pin is
//! all the overlap control the engine needs.
//!
//! # Reconciliation as Data
//!
//! The decider never performs IO. When the active list is empty and no
//! candidate survived filtering, it returns
//! [`CycleOutcome::NeedsReconciliation`] and the engine performs the
//! recently-finished lookup, feeding the result back through
//! [`FeedbackTriggerDecider::finish_reconciliation`].

use tracing::{debug, warn};

use crate::eligibility::FeedbackEligibilityStore;
use crate::persistence::PersistentKeyValueStore;
use crate::state::{TriggerCandidate, TriggerReason};
use crate::types::{Order, OrderId};

/// The decision emitted at the end of a poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Nothing to show this cycle.
    NoAction,
    /// Prompt for feedback on exactly this order.
    SinglePrompt(Order),
    /// Several orders became eligible at once; let the user pick.
    MultiSelect(Vec<Order>),
}

/// Receives decisions at the presentation boundary.
///
/// The engine calls this once per evaluated cycle (pinned cycles are
/// suppressed) and once per continuation after a submission.
pub trait DecisionSink {
    /// Called with the cycle's decision, including `NoAction`.
    fn on_decision(&mut self, decision: &Decision);
}

/// What the decider carries between cycles.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    /// No prompt is open; the next cycle evaluates normally.
    Idle,
    /// A prompt is on screen; `pending` holds the orders not yet submitted.
    Prompting { pending: Vec<Order> },
}

/// Outcome of evaluating one cycle's candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The cycle resolved to a decision.
    Decided(Decision),
    /// No candidate survived and no order is active: the engine should fetch
    /// recently finished orders and call `finish_reconciliation`.
    NeedsReconciliation,
}

/// The feedback trigger state machine.
#[derive(Debug)]
pub struct FeedbackTriggerDecider {
    phase: Phase,
}

impl Default for FeedbackTriggerDecider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackTriggerDecider {
    /// Creates an idle decider.
    pub fn new() -> Self {
        FeedbackTriggerDecider { phase: Phase::Idle }
    }

    /// True while a prompt is on screen and new actions are suppressed.
    pub fn is_pinned(&self) -> bool {
        matches!(self.phase, Phase::Prompting { .. })
    }

    /// Evaluates one cycle's candidates against the eligibility set.
    ///
    /// `active` is the post-poll active-order list; it drives the time-based
    /// deferral rule and the decision to reconcile.
    pub fn evaluate<K: PersistentKeyValueStore>(
        &mut self,
        candidates: Vec<TriggerCandidate>,
        active: &[Order],
        eligibility: &mut FeedbackEligibilityStore<K>,
    ) -> CycleOutcome {
        if self.is_pinned() {
            return CycleOutcome::Decided(Decision::NoAction);
        }

        let mut pool = candidates;

        // Priority order: status-transition, vanished, time-based. Stable
        // sort keeps snapshot order within each category.
        pool.sort_by_key(|c| match c.reason {
            TriggerReason::StatusTransition => 0u8,
            TriggerReason::Vanished => 1,
            TriggerReason::TimeBased => 2,
        });

        // One candidate per id per cycle; highest priority wins.
        let mut seen = Vec::new();
        pool.retain(|c| {
            if seen.contains(&c.order_id) {
                false
            } else {
                seen.push(c.order_id);
                true
            }
        });

        pool.retain(|c| eligibility.is_eligible(c.order_id));

        // A customer with an order still genuinely in progress is not
        // interrupted for a time-based fallback. Transition and vanish
        // candidates represent finished orders and always fire; so does a
        // fallback for an order no longer in the active list. An order stuck
        // past its ready delay no longer counts as "in progress" here,
        // otherwise the fallback could never fire for a sole stuck order.
        let other_in_progress = active.iter().any(|o| {
            !pool
                .iter()
                .any(|c| c.reason == TriggerReason::TimeBased && c.order_id == o.id)
        });
        if other_in_progress {
            pool.retain(|c| {
                c.reason != TriggerReason::TimeBased
                    || !active.iter().any(|o| o.id == c.order_id)
            });
        }

        if pool.is_empty() {
            if active.is_empty() {
                return CycleOutcome::NeedsReconciliation;
            }
            return CycleOutcome::Decided(Decision::NoAction);
        }

        let orders = resolve_candidates(pool);
        CycleOutcome::Decided(self.finalize(orders, eligibility))
    }

    /// Completes a cycle with the reconciliation lookup's results.
    pub fn finish_reconciliation<K: PersistentKeyValueStore>(
        &mut self,
        finished: Vec<Order>,
        eligibility: &mut FeedbackEligibilityStore<K>,
    ) -> Decision {
        if self.is_pinned() {
            return Decision::NoAction;
        }

        let mut orders = finished;
        orders.retain(|o| eligibility.is_eligible(o.id));
        let mut seen = Vec::new();
        orders.retain(|o| {
            if seen.contains(&o.id) {
                false
            } else {
                seen.push(o.id);
                true
            }
        });

        if !orders.is_empty() {
            debug!(count = orders.len(), "Reconciliation recovered candidates");
        }
        self.finalize(orders, eligibility)
    }

    /// Presentation layer reports a completed feedback submission.
    ///
    /// Idempotent with the marking done when the prompt was emitted. While a
    /// multi-select is open this recomputes the remaining eligible orders and
    /// returns the continuation decision (a smaller multi-select, a single
    /// prompt for the last remaining order, or `NoAction` when done).
    pub fn report_submitted<K: PersistentKeyValueStore>(
        &mut self,
        id: OrderId,
        eligibility: &mut FeedbackEligibilityStore<K>,
    ) -> Decision {
        eligibility.mark_shown(id);

        let Phase::Prompting { pending } = &mut self.phase else {
            return Decision::NoAction;
        };

        pending.retain(|o| o.id != id && eligibility.is_eligible(o.id));
        let remaining = std::mem::take(pending);
        self.phase = Phase::Idle;
        self.finalize(remaining, eligibility)
    }

    /// Presentation layer reports the prompt UI was dismissed.
    ///
    /// Unpins the decider. Orders the user never picked from a multi-select
    /// were not marked shown, so they may become candidates again later.
    pub fn report_closed(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Turns the final candidate pool into a decision, pinning and marking
    /// eligibility as required.
    fn finalize<K: PersistentKeyValueStore>(
        &mut self,
        mut orders: Vec<Order>,
        eligibility: &mut FeedbackEligibilityStore<K>,
    ) -> Decision {
        match orders.len() {
            0 => {
                self.phase = Phase::Idle;
                Decision::NoAction
            }
            1 => {
                let order = orders.remove(0);
                // Marked at display time: if the user abandons the prompt we
                // still never ask for this order again.
                eligibility.mark_shown(order.id);
                self.phase = Phase::Prompting {
                    pending: vec![order.clone()],
                };
                Decision::SinglePrompt(order)
            }
            _ => {
                // Multi-select picks are marked as each submission arrives,
                // not up front: an abandoned selection leaves the unpicked
                // orders eligible.
                self.phase = Phase::Prompting {
                    pending: orders.clone(),
                };
                Decision::MultiSelect(orders)
            }
        }
    }
}

/// Drops candidates whose order details could not be resolved.
///
/// A candidate without order details cannot be displayed; dropping it keeps
/// the poll loop alive and leaves the order eligible for a later cycle or
/// the reconciliation path.
fn resolve_candidates(pool: Vec<TriggerCandidate>) -> Vec<Order> {
    pool.into_iter()
        .filter_map(|c| match c.order {
            Some(order) => Some(order),
            None => {
                warn!(order_id = %c.order_id, reason = ?c.reason, "Dropping unresolvable candidate");
                None
            }
        })
        .collect()
}
