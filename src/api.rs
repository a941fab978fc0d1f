// src/api.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::NewsletterConfig;
use crate::newsletter::{
    self, anon_id, ApiResponse, ConvertKitClient, DynSubscriptionService, Submission,
    SubscriptionResult, SubscriptionService,
};

pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const MSG_INVALID_JSON: &str = "Invalid JSON";
pub const MSG_VALIDATION_FAILED: &str = "Validation failed";

#[derive(Clone)]
pub struct AppState {
    pub newsletter: DynSubscriptionService,
}

impl AppState {
    pub fn new<S: SubscriptionService + 'static>(service: S) -> Self {
        Self {
            newsletter: Arc::new(service),
        }
    }

    /// Production wiring: the provider client built from config.
    pub fn from_config(config: NewsletterConfig) -> Self {
        Self::new(ConvertKitClient::new(config))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/api/newsletter",
            post(subscribe).fallback(method_not_allowed),
        )
        .route(
            "/api/newsletter/unsubscribe",
            post(unsubscribe).fallback(method_not_allowed),
        )
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn json_response(status: StatusCode, body: ApiResponse) -> Response {
    (status, Json(body)).into_response()
}

fn record(route: &'static str, outcome: &'static str) {
    counter!("newsletter_requests_total", "route" => route, "outcome" => outcome).increment(1);
}

async fn method_not_allowed() -> Response {
    record("any", "method_not_allowed");
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ApiResponse::error(MSG_METHOD_NOT_ALLOWED),
    )
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_body(route: &'static str, body: &Bytes) -> Result<Value, Response> {
    serde_json::from_slice::<Value>(body).map_err(|_| {
        record(route, "invalid_json");
        json_response(StatusCode::BAD_REQUEST, ApiResponse::error(MSG_INVALID_JSON))
    })
}

fn validation_failed(route: &'static str, details: Vec<newsletter::FieldError>) -> Response {
    record(route, "invalid_input");
    let result = SubscriptionResult::failure_with_details(MSG_VALIDATION_FAILED, details);
    json_response(StatusCode::BAD_REQUEST, result.to_response())
}

fn finish(route: &'static str, outcome: anyhow::Result<SubscriptionResult>) -> Response {
    match outcome {
        Ok(result) if result.is_success() => {
            record(route, "ok");
            json_response(StatusCode::OK, result.to_response())
        }
        Ok(result) => {
            record(route, "rejected");
            json_response(StatusCode::BAD_REQUEST, result.to_response())
        }
        Err(e) => {
            record(route, "error");
            error!(target: "newsletter", route, error = ?e, "newsletter API error");
            let msg = e.to_string();
            let msg = if msg.trim().is_empty() {
                "Internal server error".to_string()
            } else {
                msg
            };
            json_response(StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::error(msg))
        }
    }
}

async fn subscribe(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let raw = match parse_body("subscribe", &body) {
        Ok(v) => v,
        Err(rsp) => return rsp,
    };
    let subscriber = match newsletter::validate(&raw) {
        Ok(s) => s,
        Err(details) => return validation_failed("subscribe", details),
    };

    let submission = Submission::website(subscriber)
        .with_user_agent(header_value(&headers, header::USER_AGENT))
        .with_referrer(header_value(&headers, header::REFERER));
    info!(
        target: "newsletter",
        id = %anon_id(&submission.email),
        has_name = submission.name.is_some(),
        "subscription request accepted"
    );

    finish("subscribe", state.newsletter.subscribe(&submission).await)
}

async fn unsubscribe(State(state): State<AppState>, body: Bytes) -> Response {
    let raw = match parse_body("unsubscribe", &body) {
        Ok(v) => v,
        Err(rsp) => return rsp,
    };
    let email = match newsletter::validate_email(&raw) {
        Ok(e) => e,
        Err(details) => return validation_failed("unsubscribe", details),
    };

    finish("unsubscribe", state.newsletter.unsubscribe(&email).await)
}
