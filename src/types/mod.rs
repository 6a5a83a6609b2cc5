//! Core domain types for the order-lifecycle engine.

mod ids;
mod order;

pub use ids::OrderId;
pub use order::{LineItem, MenuItemSnapshot, Order, OrderStatus};
