//! Read-only projections of backend orders.
//!
//! Orders are owned by the storefront backend; this crate only observes them.
//! The JSON shapes here match the REST API's camelCase payloads, so the types
//! double as wire types for the HTTP order source.
//!
//! # Terminal Statuses
//!
//! The backend reports three spellings for the terminal state (`delivered`,
//! `finished`, and `completed`) depending on which service produced the
//! order record. They are synonyms: all lifecycle logic goes through
//! [`OrderStatus::is_terminal`] rather than comparing variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::OrderId;

/// Lifecycle status of an order, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed but not yet acknowledged by the restaurant.
    Pending,
    /// Acknowledged by the restaurant.
    Accepted,
    /// In the kitchen.
    Preparing,
    /// Prepared and waiting for pickup or delivery.
    Ready,
    /// Terminal: handed to the customer.
    Delivered,
    /// Terminal: synonym for `Delivered` used by the ordering service.
    Finished,
    /// Terminal: synonym for `Delivered` used by the reservation service.
    Completed,
}

impl OrderStatus {
    /// Returns true if no further transition is expected from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Finished | OrderStatus::Completed
        )
    }

    /// Returns the backend's lowercase string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Finished => "finished",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A menu item as it looked when the order was placed.
///
/// Denormalized from the catalog so the order survives menu edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSnapshot {
    /// Display name at order time.
    pub name: String,
    /// Unit price in cents at order time.
    pub price_cents: i64,
}

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// How many of this item were ordered.
    pub quantity: u32,
    /// Free-text customer notes ("no onions").
    #[serde(default)]
    pub notes: Option<String>,
    /// The menu item this line refers to.
    pub menu_item: MenuItemSnapshot,
}

/// An order as currently known to the backend.
///
/// This is a read-only projection: the engine never mutates orders, it only
/// compares successive snapshots of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Stable backend-assigned identity.
    pub id: OrderId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Name the order was placed under.
    pub customer_name: String,
    /// Email the order was placed under.
    pub customer_email: String,
    /// Ordered sequence of line items.
    pub items: Vec<LineItem>,
    /// Order total in cents.
    pub total_amount: i64,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_order, arb_order_status};
    use proptest::prelude::*;

    #[test]
    fn terminal_statuses_are_synonyms() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Finished.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
    }

    #[test]
    fn active_statuses_are_not_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
    }

    #[test]
    fn status_decodes_backend_lowercase_strings() {
        let status: OrderStatus = serde_json::from_str("\"preparing\"").unwrap();
        assert_eq!(status, OrderStatus::Preparing);
        let status: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn order_decodes_camel_case_payload() {
        let json = r#"{
            "id": 7,
            "status": "ready",
            "customerName": "Ada",
            "customerEmail": "ada@example.com",
            "items": [
                {
                    "quantity": 2,
                    "notes": "extra sauce",
                    "menuItem": { "name": "Pad Thai", "priceCents": 1250 }
                }
            ],
            "totalAmount": 2500,
            "createdAt": "2026-08-01T12:00:00Z"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId(7));
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.items[0].menu_item.price_cents, 1250);
    }

    #[test]
    fn line_item_notes_default_to_none() {
        let json = r#"{"quantity": 1, "menuItem": {"name": "Tea", "priceCents": 300}}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.notes, None);
    }

    proptest! {
        #[test]
        fn status_serde_roundtrip(status in arb_order_status()) {
            let json = serde_json::to_string(&status).unwrap();
            let parsed: OrderStatus = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(status, parsed);
        }

        #[test]
        fn order_serde_roundtrip(order in arb_order()) {
            let json = serde_json::to_string(&order).unwrap();
            let parsed: Order = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(order, parsed);
        }

        #[test]
        fn status_string_roundtrips_through_serde(status in arb_order_status()) {
            let json = serde_json::to_string(&status).unwrap();
            prop_assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
