//! Order Sentinel - the order-lifecycle / feedback-trigger engine for a
//! restaurant ordering storefront.
//!
//! Polls a customer's in-flight orders, detects when an order reaches a
//! terminal state, and decides exactly once whether (and for which order) to
//! surface a feedback prompt, surviving restarts without re-prompting.

pub mod config;
pub mod decider;
pub mod eligibility;
pub mod engine;
pub mod persistence;
pub mod source;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_utils;
