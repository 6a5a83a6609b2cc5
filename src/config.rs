//! Polling configuration.
//!
//! The engine is polling-based by design: there is no push channel from the
//! backend, so a fixed-interval timer re-fetches the active-order list and
//! each cycle fully completes before the next fires. A slow network simply
//! delays the next decision.

use std::time::Duration;

/// Default interval between polls (10 seconds).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default delay before the ready-timer fallback fires (15 minutes).
const DEFAULT_READY_DELAY_MINS: i64 = 15;

/// Default recency window for the reconciliation lookup (24 hours).
const DEFAULT_RECENCY_WINDOW_HOURS: u32 = 24;

/// Configuration for the poll loop and fallback timers.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between poll cycles.
    ///
    /// Default: 10 seconds. Configure via `ORDER_SENTINEL_POLL_INTERVAL_SECS`.
    pub poll_interval: Duration,

    /// How long an order may sit in `ready` before the time-based fallback
    /// makes it a feedback candidate.
    ///
    /// Default: 15 minutes. Configure via `ORDER_SENTINEL_READY_DELAY_MINS`.
    pub ready_delay: chrono::Duration,

    /// Recency window passed to the finished-orders lookup, in hours.
    ///
    /// Default: 24.
    pub recency_window_hours: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    /// Creates a `PollConfig` with default values.
    pub fn new() -> Self {
        PollConfig {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            ready_delay: chrono::Duration::minutes(DEFAULT_READY_DELAY_MINS),
            recency_window_hours: DEFAULT_RECENCY_WINDOW_HOURS,
        }
    }

    /// Creates a `PollConfig` from environment variables.
    ///
    /// Reads `ORDER_SENTINEL_POLL_INTERVAL_SECS` and
    /// `ORDER_SENTINEL_READY_DELAY_MINS`; unset or unparsable values fall
    /// back to defaults.
    pub fn from_env() -> Self {
        let poll_secs = std::env::var("ORDER_SENTINEL_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let ready_mins = std::env::var("ORDER_SENTINEL_READY_DELAY_MINS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_READY_DELAY_MINS);

        PollConfig {
            poll_interval: Duration::from_secs(poll_secs),
            ready_delay: chrono::Duration::minutes(ready_mins),
            ..Self::new()
        }
    }
}
