//! The persisted "do not ask again" set.
//!
//! The single source of truth for whether an order may still trigger a
//! feedback prompt. The set only grows: an id is added when a prompt is shown
//! or a submission is reported, and nothing short of the explicit
//! [`FeedbackEligibilityStore::clear`] maintenance operation removes it.
//!
//! Every mutation is written through the [`PersistentKeyValueStore`] before
//! returning, so a page-reload-equivalent restart between polls cannot
//! resurrect a prompt. A failed write is a degraded mode, not a fatal one:
//! the in-memory set still updates (no duplicate within this session) and the
//! failure is logged. The worst case after a restart is one extra prompt.

use std::collections::BTreeSet;

use tracing::warn;

use crate::persistence::PersistentKeyValueStore;
use crate::types::OrderId;

/// Durable key under which the shown-order ids are stored.
///
/// The value is a JSON array of integers, sorted ascending for stable diffs.
pub const ELIGIBILITY_KEY: &str = "feedback_shown_orders";

/// Persisted set of order ids that have already been offered feedback.
#[derive(Debug)]
pub struct FeedbackEligibilityStore<K> {
    shown: BTreeSet<OrderId>,
    store: K,
}

impl<K: PersistentKeyValueStore> FeedbackEligibilityStore<K> {
    /// Loads the shown-set from the backing store.
    ///
    /// A missing key means a fresh install (empty set). A present but
    /// unreadable value is treated the same way, with a warning: losing the
    /// set risks duplicate prompts, which is the accepted degraded mode, while
    /// refusing to start is not.
    pub fn load(store: K) -> Self {
        let shown = match store.get(ELIGIBILITY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<u64>>(&raw) {
                Ok(ids) => ids.into_iter().map(OrderId).collect(),
                Err(e) => {
                    warn!(error = %e, "Eligibility state unreadable, starting empty");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(error = %e, "Eligibility state unavailable, starting empty");
                BTreeSet::new()
            }
        };

        FeedbackEligibilityStore { shown, store }
    }

    /// True iff the order has not yet been offered feedback.
    pub fn is_eligible(&self, id: OrderId) -> bool {
        !self.shown.contains(&id)
    }

    /// Records that a prompt was shown (or a submission completed) for `id`.
    ///
    /// Idempotent: re-marking an already-marked id does not rewrite the store.
    /// The write is flushed before this returns.
    pub fn mark_shown(&mut self, id: OrderId) {
        if !self.shown.insert(id) {
            return;
        }
        self.persist();
    }

    /// Maintenance escape hatch: forgets every marked id.
    pub fn clear(&mut self) {
        if self.shown.is_empty() {
            return;
        }
        self.shown.clear();
        self.persist();
    }

    /// Number of ids marked so far.
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// True iff no id has been marked.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    fn persist(&mut self) {
        let ids: Vec<u64> = self.shown.iter().map(|id| id.0).collect();
        // Serializing Vec<u64> cannot fail.
        let raw = serde_json::to_string(&ids).unwrap_or_default();
        if let Err(e) = self.store.set(ELIGIBILITY_KEY, &raw) {
            warn!(
                error = %e,
                "Failed to persist eligibility state; duplicates possible after restart"
            );
        }
    }
}
