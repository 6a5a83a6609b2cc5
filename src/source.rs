//! Read-only access to the backend's order lists.
//!
//! The engine consumes two queries: the orders not yet in a terminal state,
//! and the terminal orders within a bounded recency window (used for
//! reconciliation after missed polls). Both are pure queries; all lifecycle
//! logic lives on this side of the trait.
//!
//! The trait-based design enables:
//! - the HTTP implementation used by the binary,
//! - scripted sources for tests,
//! - a caching or rate-limiting wrapper later if the backend needs one.

use std::future::Future;

use thiserror::Error;

use crate::types::Order;

/// Errors from an order source.
///
/// Every variant is transient from the engine's point of view: a failed fetch
/// is logged and retried on the next poll cycle, never surfaced as a hard
/// failure.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The HTTP request itself failed (connect, timeout, or body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("unexpected status {status} from {endpoint}")]
    Status {
        /// Which endpoint answered.
        endpoint: &'static str,
        /// The HTTP status code.
        status: u16,
    },

    /// The source is unavailable for a non-HTTP reason.
    #[error("order source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current order snapshots.
pub trait OrderSource {
    /// Orders not yet in a terminal state, as currently known to the backend.
    fn list_active_orders(&self) -> impl Future<Output = Result<Vec<Order>, SourceError>> + Send;

    /// Terminal-state orders within the backend's recency window.
    fn list_recently_finished_orders(
        &self,
    ) -> impl Future<Output = Result<Vec<Order>, SourceError>> + Send;
}

/// reqwest-backed source hitting the storefront REST API.
///
/// Endpoints:
/// - `GET {base}/orders/active`
/// - `GET {base}/orders/finished?window_hours={n}`
#[derive(Debug, Clone)]
pub struct HttpOrderSource {
    client: reqwest::Client,
    base_url: String,
    window_hours: u32,
}

impl HttpOrderSource {
    /// Creates a source for the API at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, window_hours: u32) -> Self {
        HttpOrderSource {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            window_hours,
        }
    }

    async fn fetch(&self, url: String, endpoint: &'static str) -> Result<Vec<Order>, SourceError> {
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                endpoint,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

impl OrderSource for HttpOrderSource {
    async fn list_active_orders(&self) -> Result<Vec<Order>, SourceError> {
        self.fetch(format!("{}/orders/active", self.base_url), "active")
            .await
    }

    async fn list_recently_finished_orders(&self) -> Result<Vec<Order>, SourceError> {
        self.fetch(
            format!(
                "{}/orders/finished?window_hours={}",
                self.base_url, self.window_hours
            ),
            "finished",
        )
        .await
    }
}
