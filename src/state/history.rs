//! Last-observed status per order.
//!
//! The history is the "previous snapshot" side of transition detection. It is
//! replaced wholesale at the end of every poll cycle, which gives vanished
//! orders exactly one cycle of retention: the cycle that notices the
//! disappearance still sees the old entry, the next cycle does not.

use std::collections::HashMap;

use crate::types::{Order, OrderId, OrderStatus};

/// Mapping from order id to the status observed on the previous poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHistory {
    statuses: HashMap<OrderId, OrderStatus>,
}

impl StatusHistory {
    /// Creates an empty history (no orders observed yet).
    pub fn new() -> Self {
        StatusHistory {
            statuses: HashMap::new(),
        }
    }

    /// Builds a history directly from a snapshot of orders.
    pub fn from_orders(orders: &[Order]) -> Self {
        StatusHistory {
            statuses: orders.iter().map(|o| (o.id, o.status)).collect(),
        }
    }

    /// Returns the last observed status for an order, if any.
    pub fn status_of(&self, id: OrderId) -> Option<OrderStatus> {
        self.statuses.get(&id).copied()
    }

    /// Replaces the entire history with the given snapshot.
    ///
    /// Must be called exactly once per poll cycle, after transition detection
    /// has consumed the old entries.
    pub fn replace_with(&mut self, orders: &[Order]) {
        self.statuses = orders.iter().map(|o| (o.id, o.status)).collect();
    }

    /// Iterates over all (id, status) pairs from the previous snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (OrderId, OrderStatus)> + '_ {
        self.statuses.iter().map(|(id, status)| (*id, *status))
    }

    /// Returns true if no orders have been observed.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Number of orders in the previous snapshot.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::order_with_status;

    #[test]
    fn from_orders_records_every_status() {
        let orders = vec![
            order_with_status(1, OrderStatus::Pending),
            order_with_status(2, OrderStatus::Ready),
        ];
        let history = StatusHistory::from_orders(&orders);

        assert_eq!(history.status_of(OrderId(1)), Some(OrderStatus::Pending));
        assert_eq!(history.status_of(OrderId(2)), Some(OrderStatus::Ready));
        assert_eq!(history.status_of(OrderId(3)), None);
    }

    #[test]
    fn replace_with_drops_absent_orders() {
        let mut history = StatusHistory::from_orders(&[
            order_with_status(1, OrderStatus::Preparing),
            order_with_status(2, OrderStatus::Ready),
        ]);

        history.replace_with(&[order_with_status(2, OrderStatus::Ready)]);

        assert_eq!(history.status_of(OrderId(1)), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn new_history_is_empty() {
        assert!(StatusHistory::new().is_empty());
    }
}
