//! The poll-cycle orchestrator.
//!
//! One cycle = fetch snapshot, detect, decide, persist:
//!
//! 1. Fetch the active-order list from the [`OrderSource`].
//! 2. Compare it against the previous cycle's [`StatusHistory`] to find
//!    observed terminal transitions and vanishes.
//! 3. Feed ready timers and collect expired time-based candidates.
//! 4. Let the [`FeedbackTriggerDecider`] reduce the candidates to a decision,
//!    performing the reconciliation lookup if it asks for one.
//! 5. Replace the history with the new snapshot and emit the decision.
//!
//! A single tokio task drives [`Engine::run`]; each cycle fully completes
//! (both network calls awaited sequentially) before the next fires, so no
//! locking is needed. No cycle failure ever stops the loop: fetch errors
//! resolve the cycle to no action and the timer reschedules.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::PollConfig;
use crate::decider::{CycleOutcome, Decision, DecisionSink, FeedbackTriggerDecider};
use crate::eligibility::FeedbackEligibilityStore;
use crate::persistence::PersistentKeyValueStore;
use crate::source::OrderSource;
use crate::state::{ReadyTimers, StatusHistory, TriggerCandidate, detect_transitions};
use crate::types::{Order, OrderId, OrderStatus};

/// Drives the order-lifecycle feedback engine.
pub struct Engine<S, K, D> {
    source: S,
    sink: D,
    config: PollConfig,
    history: StatusHistory,
    ready: ReadyTimers,
    eligibility: FeedbackEligibilityStore<K>,
    decider: FeedbackTriggerDecider,
}

impl<S, K, D> Engine<S, K, D>
where
    S: OrderSource,
    K: PersistentKeyValueStore,
    D: DecisionSink,
{
    /// Creates an engine over the given collaborators.
    pub fn new(
        source: S,
        sink: D,
        eligibility: FeedbackEligibilityStore<K>,
        config: PollConfig,
    ) -> Self {
        Engine {
            source,
            sink,
            config,
            history: StatusHistory::new(),
            ready: ReadyTimers::new(),
            eligibility,
            decider: FeedbackTriggerDecider::new(),
        }
    }

    /// Runs poll cycles on a fixed interval until `shutdown` is cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(interval = ?self.config.poll_interval, "Poll loop started");

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received, stopping poll loop");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle(Utc::now()).await;
                }
            }
        }

        info!("Poll loop stopped");
    }

    /// Executes one poll cycle.
    ///
    /// Returns the cycle's decision (also delivered to the sink, except for
    /// suppressed pinned cycles). `now` is injected so tests can drive the
    /// ready-timer fallback without a clock.
    #[instrument(skip(self, now))]
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Decision {
        let active = match self.source.list_active_orders().await {
            Ok(active) => active,
            Err(e) => {
                warn!(error = %e, "Active-order fetch failed; retrying next cycle");
                return Decision::NoAction;
            }
        };

        for order in &active {
            self.ready.observe(order.id, order.status, now);
        }

        // While a prompt is displayed the snapshot still refreshes, but no
        // new action may be produced until the presentation layer reports
        // closure.
        if self.decider.is_pinned() {
            debug!("Prompt open; cycle refreshes state only");
            self.replace_snapshot(&active);
            return Decision::NoAction;
        }

        let mut candidates = detect_transitions(&self.history, &active);
        self.collect_time_based(&active, now, &mut candidates);

        // Vanished candidates carry no order details; resolve them against
        // the recently-finished list so they can be displayed. Unresolved
        // candidates are dropped by the decider and stay eligible.
        let mut finished_cache = None;
        if candidates.iter().any(|c| c.order.is_none()) {
            match self.source.list_recently_finished_orders().await {
                Ok(finished) => {
                    for candidate in candidates.iter_mut().filter(|c| c.order.is_none()) {
                        candidate.order =
                            finished.iter().find(|o| o.id == candidate.order_id).cloned();
                    }
                    finished_cache = Some(finished);
                }
                Err(e) => {
                    warn!(error = %e, "Finished-order lookup failed; candidates left unresolved");
                }
            }
        }

        let outcome = self
            .decider
            .evaluate(candidates, &active, &mut self.eligibility);

        let decision = match outcome {
            CycleOutcome::Decided(decision) => decision,
            CycleOutcome::NeedsReconciliation => {
                let finished = match finished_cache {
                    Some(finished) => Ok(finished),
                    None => self.source.list_recently_finished_orders().await,
                };
                match finished {
                    Ok(finished) => self
                        .decider
                        .finish_reconciliation(finished, &mut self.eligibility),
                    Err(e) => {
                        warn!(error = %e, "Reconciliation lookup failed; retrying next cycle");
                        Decision::NoAction
                    }
                }
            }
        };

        self.replace_snapshot(&active);
        self.sink.on_decision(&decision);
        decision
    }

    /// Presentation layer reports a completed feedback submission.
    ///
    /// Delivers the continuation decision (remaining multi-select orders, or
    /// `NoAction` when the flow is complete) to the sink.
    pub fn report_submitted(&mut self, id: OrderId) -> Decision {
        let decision = self.decider.report_submitted(id, &mut self.eligibility);
        self.sink.on_decision(&decision);
        decision
    }

    /// Presentation layer reports the prompt UI was dismissed.
    pub fn report_closed(&mut self) {
        self.decider.report_closed();
    }

    /// Maintenance escape hatch: forget every order already prompted.
    pub fn clear_tracking(&mut self) {
        self.eligibility.clear();
    }

    fn collect_time_based(
        &self,
        active: &[Order],
        now: DateTime<Utc>,
        candidates: &mut Vec<TriggerCandidate>,
    ) {
        for order in active {
            if order.status == OrderStatus::Ready
                && self.ready.expired(order.id, now, self.config.ready_delay)
                && !candidates.iter().any(|c| c.order_id == order.id)
            {
                candidates.push(TriggerCandidate::time_based(order.clone()));
            }
        }
    }

    fn replace_snapshot(&mut self, active: &[Order]) {
        self.history.replace_with(active);
        let active_ids = active.iter().map(|o| o.id).collect();
        self.ready.retain_active(&active_ids);
    }
}
