// src/config/newsletter.rs
use anyhow::bail;
use std::env;
use tracing::{info, warn};

// --- env names & defaults ---
pub const ENV_API_URL: &str = "NEWSLETTER_API_URL";
pub const ENV_API_KEY: &str = "NEWSLETTER_API_KEY";
pub const ENV_LIST_ID: &str = "NEWSLETTER_LIST_ID";
pub const ENV_FORM_ID: &str = "NEWSLETTER_FORM_ID";
pub const ENV_SITE_URL: &str = "PUBLIC_SITE_URL";
pub const ENV_CONFIG_MODE: &str = "NEWSLETTER_CONFIG_MODE";

pub const DEFAULT_API_URL: &str = "https://api.convertkit.com/v3";
pub const DEFAULT_SITE_URL: &str = "https://stack-junkie.com";
pub const PLACEHOLDER_API_KEY: &str = "build-time-placeholder";

/// How strictly a missing API key is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigMode {
    /// Serving real traffic: a missing key is fatal.
    #[default]
    Runtime,
    /// Packaging/static analysis: a missing key is replaced by a placeholder
    /// and the client refuses to make provider calls.
    Build,
}

impl ConfigMode {
    /// `NEWSLETTER_CONFIG_MODE=build` selects [`ConfigMode::Build`]; anything else is runtime.
    pub fn from_env() -> Self {
        match env::var(ENV_CONFIG_MODE)
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "build" => ConfigMode::Build,
            _ => ConfigMode::Runtime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterConfig {
    pub api_url: String,
    pub api_key: String,
    pub list_id: Option<String>,
    pub form_id: Option<String>,
    pub site_url: String,
}

impl NewsletterConfig {
    /// Assemble the config from the process environment.
    pub fn from_env(mode: ConfigMode) -> anyhow::Result<Self> {
        Self::from_lookup(mode, |key| env::var(key).ok())
    }

    /// Assemble the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(mode: ConfigMode, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get(ENV_API_URL)
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let list_id = get(ENV_LIST_ID);
        let form_id = get(ENV_FORM_ID);
        let site_url = get(ENV_SITE_URL).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        let api_key = match (get(ENV_API_KEY), mode) {
            (Some(key), _) => key,
            (None, ConfigMode::Build) => {
                warn!(
                    target: "newsletter",
                    "Newsletter API key not configured - newsletter functionality will be disabled"
                );
                PLACEHOLDER_API_KEY.to_string()
            }
            (None, ConfigMode::Runtime) => {
                bail!("{ENV_API_KEY} environment variable is required")
            }
        };

        // Safe diagnostics: never the key itself
        info!(
            target: "newsletter",
            api_url = %api_url,
            form_id = ?form_id,
            list_id = ?list_id,
            key_len = api_key.len(),
            "newsletter config loaded"
        );

        Ok(Self {
            api_url,
            api_key,
            list_id,
            form_id,
            site_url,
        })
    }

    /// True when the key was substituted because none was configured.
    pub fn is_placeholder(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }

    pub fn public_site_url(&self) -> &str {
        &self.site_url
    }
}

/// Whether a runtime-grade config can be assembled from `lookup`.
pub fn validate_newsletter_config<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    NewsletterConfig::from_lookup(ConfigMode::Runtime, lookup).is_ok()
}
