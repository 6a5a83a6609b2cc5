//! In-memory per-cycle state: status history, ready timers, and the pure
//! transition detector that compares successive snapshots.

mod history;
mod ready;
mod transitions;

pub use history::StatusHistory;
pub use ready::ReadyTimers;
pub use transitions::{TriggerCandidate, TriggerReason, detect_transitions};
