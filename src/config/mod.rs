// src/config/mod.rs
pub mod newsletter;

pub use newsletter::{validate_newsletter_config, ConfigMode, NewsletterConfig};
