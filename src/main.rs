use order_sentinel::config::PollConfig;
use order_sentinel::decider::{Decision, DecisionSink};
use order_sentinel::eligibility::FeedbackEligibilityStore;
use order_sentinel::engine::Engine;
use order_sentinel::persistence::FileKvStore;
use order_sentinel::source::HttpOrderSource;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logs decisions; a storefront embeds the engine behind its own UI instead.
struct LoggingSink;

impl DecisionSink for LoggingSink {
    fn on_decision(&mut self, decision: &Decision) {
        match decision {
            Decision::NoAction => {}
            Decision::SinglePrompt(order) => {
                tracing::info!(order = %order.id, "Feedback prompt due");
            }
            Decision::MultiSelect(orders) => {
                tracing::info!(count = orders.len(), "Multiple orders awaiting feedback");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_sentinel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PollConfig::from_env();
    let api_base = std::env::var("ORDER_SENTINEL_API_BASE")
        .unwrap_or_else(|_| "http://localhost:8000/api".to_string());
    let state_dir =
        std::env::var("ORDER_SENTINEL_STATE_DIR").unwrap_or_else(|_| "./state".to_string());

    let eligibility = FeedbackEligibilityStore::load(FileKvStore::new(&state_dir));
    let source = HttpOrderSource::new(api_base, config.recency_window_hours);
    let engine = Engine::new(source, LoggingSink, eligibility, config);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    engine.run(shutdown).await;
}
