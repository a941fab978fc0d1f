// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod carousel;
pub mod config;
pub mod content;
pub mod metrics;
pub mod newsletter;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router as router, AppState};
pub use crate::config::{ConfigMode, NewsletterConfig};
pub use crate::newsletter::{SubscriptionResult, SubscriptionService};

/// Build the full application router from the process environment:
/// newsletter config per `NEWSLETTER_CONFIG_MODE`, provider client, routes.
pub fn app_from_env() -> anyhow::Result<axum::Router> {
    let config = NewsletterConfig::from_env(ConfigMode::from_env())?;
    Ok(api::create_router(AppState::from_config(config)))
}
