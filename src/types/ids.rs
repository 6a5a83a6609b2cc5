//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types and make the
//! code more self-documenting. Order IDs are stable integers assigned by the
//! backend; they are the identity used for de-duplication, so they must
//! serialize transparently (the persisted eligibility set is a plain JSON
//! array of integers).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A backend-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order #{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(n: u64) -> Self {
        OrderId(n)
    }
}
