// tests/config_env.rs
use stack_junkie::config::newsletter::{
    DEFAULT_API_URL, ENV_API_KEY, ENV_API_URL, ENV_CONFIG_MODE, ENV_FORM_ID, ENV_LIST_ID,
    ENV_SITE_URL, PLACEHOLDER_API_KEY,
};
use stack_junkie::config::{ConfigMode, NewsletterConfig};
use std::env;

fn clear_env() {
    for k in [
        ENV_API_URL,
        ENV_API_KEY,
        ENV_LIST_ID,
        ENV_FORM_ID,
        ENV_SITE_URL,
        ENV_CONFIG_MODE,
    ] {
        env::remove_var(k);
    }
}

#[serial_test::serial]
#[test]
fn from_env_reads_process_environment() {
    clear_env();
    env::set_var(ENV_API_KEY, "env-key");
    env::set_var(ENV_FORM_ID, "99");

    let cfg = NewsletterConfig::from_env(ConfigMode::Runtime).unwrap();
    assert_eq!(cfg.api_key, "env-key");
    assert_eq!(cfg.form_id.as_deref(), Some("99"));
    assert_eq!(cfg.api_url, DEFAULT_API_URL);

    clear_env();
}

#[serial_test::serial]
#[test]
fn build_mode_tolerates_missing_key() {
    clear_env();
    env::set_var(ENV_CONFIG_MODE, "BUILD");
    assert_eq!(ConfigMode::from_env(), ConfigMode::Build);

    let cfg = NewsletterConfig::from_env(ConfigMode::from_env()).unwrap();
    assert_eq!(cfg.api_key, PLACEHOLDER_API_KEY);

    env::remove_var(ENV_CONFIG_MODE);
    assert_eq!(ConfigMode::from_env(), ConfigMode::Runtime);
    assert!(NewsletterConfig::from_env(ConfigMode::from_env()).is_err());

    clear_env();
}

#[serial_test::serial]
#[test]
fn app_from_env_requires_key_at_runtime() {
    clear_env();
    assert!(stack_junkie::app_from_env().is_err());

    env::set_var(ENV_API_KEY, "k");
    assert!(stack_junkie::app_from_env().is_ok());

    clear_env();
}
