//! Wall-clock timers for orders stuck in the "ready" state.
//!
//! An order that reaches `ready` and then never transitions (a pickup order
//! the backend forgets to close out, say) would otherwise never trigger a
//! feedback prompt. These timers back the time-based fallback: the first
//! observation of `ready` is recorded, and once enough time has elapsed the
//! order becomes a fallback candidate.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::types::{OrderId, OrderStatus};

/// Timestamps of the first `ready` observation per order.
#[derive(Debug, Clone, Default)]
pub struct ReadyTimers {
    first_ready: HashMap<OrderId, DateTime<Utc>>,
}

impl ReadyTimers {
    /// Creates an empty timer set.
    pub fn new() -> Self {
        ReadyTimers {
            first_ready: HashMap::new(),
        }
    }

    /// Records `now` the first time `ready` is observed for this order.
    ///
    /// First observation wins: subsequent calls for the same order are no-ops,
    /// even if the order bounces out of and back into `ready`.
    pub fn observe(&mut self, id: OrderId, status: OrderStatus, now: DateTime<Utc>) {
        if status == OrderStatus::Ready {
            self.first_ready.entry(id).or_insert(now);
        }
    }

    /// Returns true iff a ready-time was recorded and at least `delay` has
    /// elapsed since it.
    pub fn expired(&self, id: OrderId, now: DateTime<Utc>, delay: chrono::Duration) -> bool {
        match self.first_ready.get(&id) {
            Some(first) => now - *first >= delay,
            None => false,
        }
    }

    /// Returns when the order was first seen in `ready`, if ever.
    pub fn first_ready_at(&self, id: OrderId) -> Option<DateTime<Utc>> {
        self.first_ready.get(&id).copied()
    }

    /// Drops timers for orders no longer in the active set.
    ///
    /// Called after each cycle's evaluation so the map does not grow without
    /// bound. Orders that left the active list have already produced their
    /// vanish candidate by the time this runs.
    pub fn retain_active(&mut self, active: &HashSet<OrderId>) {
        self.first_ready.retain(|id, _| active.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2026-08-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn first_observation_wins() {
        let mut timers = ReadyTimers::new();
        timers.observe(OrderId(1), OrderStatus::Ready, t0());
        timers.observe(OrderId(1), OrderStatus::Ready, t0() + Duration::minutes(5));

        assert_eq!(timers.first_ready_at(OrderId(1)), Some(t0()));
    }

    #[test]
    fn non_ready_statuses_do_not_record() {
        let mut timers = ReadyTimers::new();
        timers.observe(OrderId(1), OrderStatus::Preparing, t0());

        assert_eq!(timers.first_ready_at(OrderId(1)), None);
        assert!(!timers.expired(OrderId(1), t0() + Duration::hours(1), Duration::minutes(15)));
    }

    #[test]
    fn expired_boundary_is_inclusive() {
        let mut timers = ReadyTimers::new();
        timers.observe(OrderId(1), OrderStatus::Ready, t0());
        let delay = Duration::minutes(15);

        // One millisecond short: not expired.
        let just_before = t0() + delay - Duration::milliseconds(1);
        assert!(!timers.expired(OrderId(1), just_before, delay));

        // Exactly at the deadline: expired (contract is >=).
        assert!(timers.expired(OrderId(1), t0() + delay, delay));

        // One millisecond past: expired.
        let just_after = t0() + delay + Duration::milliseconds(1);
        assert!(timers.expired(OrderId(1), just_after, delay));
    }

    #[test]
    fn unknown_order_never_expires() {
        let timers = ReadyTimers::new();
        assert!(!timers.expired(OrderId(9), t0(), Duration::zero()));
    }

    #[test]
    fn retain_active_drops_departed_orders() {
        let mut timers = ReadyTimers::new();
        timers.observe(OrderId(1), OrderStatus::Ready, t0());
        timers.observe(OrderId(2), OrderStatus::Ready, t0());

        let active: HashSet<OrderId> = [OrderId(2)].into_iter().collect();
        timers.retain_active(&active);

        assert_eq!(timers.first_ready_at(OrderId(1)), None);
        assert_eq!(timers.first_ready_at(OrderId(2)), Some(t0()));
    }
}
