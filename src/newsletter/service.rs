// src/newsletter/service.rs
//! Mailing-list provider client.
//!
//! The provider's JSON is treated as untyped and narrowed here into
//! [`SubscriptionResult`], so no provider-specific shape leaks to callers.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::anon_id;
use super::types::{FieldError, Submission, SubscriptionResult};
use crate::config::NewsletterConfig;

pub const MSG_SUBSCRIBED: &str = "Successfully subscribed to newsletter!";
pub const MSG_UNSUBSCRIBED: &str = "Successfully unsubscribed from newsletter";
pub const MSG_SUBSCRIBE_FAILED: &str = "Failed to subscribe to newsletter";
pub const MSG_UNSUBSCRIBE_FAILED: &str = "Failed to unsubscribe from newsletter";
pub const MSG_NETWORK_ERROR: &str = "Network error occurred";
pub const MSG_NOT_CONFIGURED: &str = "Newsletter is not configured";
pub const MSG_FORM_NOT_CONFIGURED: &str = "Newsletter form is not configured";

/// Seam between the HTTP handlers and the mailing-list provider.
///
/// Provider rejections and transport failures come back as
/// `Ok(SubscriptionResult::Failure { .. })`; `Err` means something unexpected
/// and is turned into a 500 by the route.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn subscribe(&self, submission: &Submission) -> anyhow::Result<SubscriptionResult>;
    async fn unsubscribe(&self, email: &str) -> anyhow::Result<SubscriptionResult>;
}

/// Convenient alias used by the router state.
pub type DynSubscriptionService = Arc<dyn SubscriptionService>;

/// ConvertKit-style HTTP client. Built once from [`NewsletterConfig`] and injected.
#[derive(Clone)]
pub struct ConvertKitClient {
    config: NewsletterConfig,
    client: Client,
}

#[derive(Serialize)]
struct SubscribePayload<'a> {
    api_key: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    tags: [&'a str; 1],
}

#[derive(Serialize)]
struct UnsubscribePayload<'a> {
    api_key: &'a str,
    email: &'a str,
}

impl ConvertKitClient {
    pub fn new(config: NewsletterConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(StatusCode, Value), String> {
        let rsp = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = rsp.status();
        let value = rsp.json::<Value>().await.map_err(|e| e.to_string())?;
        Ok((status, value))
    }
}

#[async_trait]
impl SubscriptionService for ConvertKitClient {
    async fn subscribe(&self, submission: &Submission) -> anyhow::Result<SubscriptionResult> {
        let id = anon_id(&submission.email);
        if self.config.is_placeholder() {
            warn!(target: "newsletter", %id, "subscribe skipped: no API key configured");
            return Ok(SubscriptionResult::failure(MSG_NOT_CONFIGURED));
        }
        let Some(form_id) = self.config.form_id.as_deref() else {
            warn!(target: "newsletter", %id, "subscribe skipped: no form id configured");
            return Ok(SubscriptionResult::failure(MSG_FORM_NOT_CONFIGURED));
        };

        let url = format!("{}/forms/{}/subscribe", self.config.api_url, form_id);
        let payload = SubscribePayload {
            api_key: &self.config.api_key,
            email: &submission.email,
            first_name: submission.name.as_deref(),
            tags: [submission.source.as_str()],
        };

        let result = match self.post_json(&url, &payload).await {
            Ok((status, body)) => {
                map_provider_response(status, &body, MSG_SUBSCRIBED, MSG_SUBSCRIBE_FAILED)
            }
            Err(e) => transport_failure(e),
        };
        info!(
            target: "newsletter",
            %id,
            source = %submission.source,
            ok = result.is_success(),
            "subscribe finished"
        );
        Ok(result)
    }

    async fn unsubscribe(&self, email: &str) -> anyhow::Result<SubscriptionResult> {
        let id = anon_id(email);
        if self.config.is_placeholder() {
            warn!(target: "newsletter", %id, "unsubscribe skipped: no API key configured");
            return Ok(SubscriptionResult::failure(MSG_NOT_CONFIGURED));
        }

        let url = format!("{}/unsubscribe", self.config.api_url);
        let payload = UnsubscribePayload {
            api_key: &self.config.api_key,
            email,
        };

        let result = match self.post_json(&url, &payload).await {
            Ok((status, body)) => {
                // field details are not part of the unsubscribe contract
                let mapped = map_provider_response(
                    status,
                    &body,
                    MSG_UNSUBSCRIBED,
                    MSG_UNSUBSCRIBE_FAILED,
                );
                match mapped {
                    SubscriptionResult::Failure { error, .. } => {
                        SubscriptionResult::failure(error)
                    }
                    ok => ok,
                }
            }
            Err(e) => transport_failure(e),
        };
        info!(target: "newsletter", %id, ok = result.is_success(), "unsubscribe finished");
        Ok(result)
    }
}

fn transport_failure(message: String) -> SubscriptionResult {
    warn!(target: "newsletter", error = %message, "provider call failed");
    if message.trim().is_empty() {
        SubscriptionResult::failure(MSG_NETWORK_ERROR)
    } else {
        SubscriptionResult::failure(message)
    }
}

/// Narrow a provider reply into the uniform result.
pub fn map_provider_response(
    status: StatusCode,
    body: &Value,
    default_ok: &str,
    default_err: &str,
) -> SubscriptionResult {
    let message = non_blank(body.get("message"));
    let error_payload = body.get("error").filter(|e| !e.is_null());

    if status.is_success() && error_payload.is_none() {
        return SubscriptionResult::success(message.unwrap_or(default_ok));
    }

    let error = message
        .or_else(|| non_blank(error_payload))
        .unwrap_or(default_err)
        .to_string();

    let details = body
        .get("errors")
        .and_then(Value::as_object)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|(field, msg)| {
                    first_message(msg).map(|m| FieldError::new(field.as_str(), m))
                })
                .collect::<Vec<_>>()
        })
        .filter(|d| !d.is_empty());

    SubscriptionResult::Failure { error, details }
}

// Blank provider strings count as absent.
fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

// First message wins when a field has several.
fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(first_message),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscribe_reply(status: StatusCode, body: Value) -> SubscriptionResult {
        map_provider_response(status, &body, MSG_SUBSCRIBED, MSG_SUBSCRIBE_FAILED)
    }

    #[test]
    fn success_uses_provider_message_when_given() {
        let r = subscribe_reply(StatusCode::OK, json!({ "message": "Welcome!" }));
        assert_eq!(r, SubscriptionResult::success("Welcome!"));

        let r = subscribe_reply(StatusCode::OK, json!({ "subscription": { "id": 1 } }));
        assert_eq!(r, SubscriptionResult::success(MSG_SUBSCRIBED));
    }

    #[test]
    fn non_2xx_maps_message_and_field_errors() {
        let body = json!({
            "message": "Email already subscribed",
            "errors": { "email": ["is taken", "second"], "first_name": "too odd" }
        });
        let r = subscribe_reply(StatusCode::UNPROCESSABLE_ENTITY, body);
        let SubscriptionResult::Failure { error, details } = r else {
            panic!("expected failure");
        };
        assert_eq!(error, "Email already subscribed");
        let details = details.expect("details");
        assert!(details.contains(&FieldError::new("email", "is taken")));
        assert!(details.contains(&FieldError::new("first_name", "too odd")));
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn error_payload_on_2xx_is_a_failure() {
        let r = subscribe_reply(StatusCode::OK, json!({ "error": "Not Found" }));
        assert_eq!(r, SubscriptionResult::failure("Not Found"));
    }

    #[test]
    fn failure_without_message_uses_default() {
        let r = subscribe_reply(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        assert_eq!(r, SubscriptionResult::failure(MSG_SUBSCRIBE_FAILED));
    }

    #[test]
    fn blank_provider_strings_fall_back_to_defaults() {
        let r = subscribe_reply(StatusCode::UNPROCESSABLE_ENTITY, json!({ "message": "" }));
        assert_eq!(r, SubscriptionResult::failure(MSG_SUBSCRIBE_FAILED));

        let r = subscribe_reply(StatusCode::OK, json!({ "message": "   " }));
        assert_eq!(r, SubscriptionResult::success(MSG_SUBSCRIBED));

        // blank message defers to a usable error string
        let r = subscribe_reply(StatusCode::NOT_FOUND, json!({ "message": " ", "error": "Gone" }));
        assert_eq!(r, SubscriptionResult::failure("Gone"));

        let r = subscribe_reply(StatusCode::BAD_REQUEST, json!({ "error": "  " }));
        assert_eq!(r, SubscriptionResult::failure(MSG_SUBSCRIBE_FAILED));
    }

    #[test]
    fn blank_transport_error_becomes_generic() {
        assert_eq!(
            transport_failure(String::new()),
            SubscriptionResult::failure(MSG_NETWORK_ERROR)
        );
        assert_eq!(
            transport_failure("connection refused".into()),
            SubscriptionResult::failure("connection refused")
        );
    }
}
