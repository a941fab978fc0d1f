// src/newsletter/types.rs
use serde::{Deserialize, Serialize};

/// Origin tag attached to submissions coming from the site's own forms.
pub const DEFAULT_SOURCE: &str = "website";

/// One field-level problem, either from local validation or from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Uniform outcome of every newsletter operation, whatever the failure origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionResult {
    Success {
        message: Option<String>,
    },
    Failure {
        error: String,
        details: Option<Vec<FieldError>>,
    },
}

impl SubscriptionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            details: None,
        }
    }

    pub fn failure_with_details(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::Failure {
            error: error.into(),
            details: Some(details),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Wire shape sent to browsers.
    pub fn to_response(&self) -> ApiResponse {
        match self {
            Self::Success { message } => ApiResponse {
                success: true,
                message: message.clone(),
                error: None,
                details: None,
            },
            Self::Failure { error, details } => ApiResponse {
                success: false,
                message: None,
                error: Some(error.clone()),
                details: details.clone(),
            },
        }
    }
}

/// `{ success, message?, error?, details? }` with absent fields omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Validated subscriber data: lowercase trimmed email, trimmed optional name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
    pub name: Option<String>,
}

/// A validated subscriber plus provenance metadata for the provider's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub name: Option<String>,
    pub source: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl Submission {
    /// Stamp a subscriber with the default source and the current time.
    pub fn website(subscriber: NewSubscriber) -> Self {
        Self {
            email: subscriber.email,
            name: subscriber.name,
            source: DEFAULT_SOURCE.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            user_agent: None,
            referrer: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent.filter(|s| !s.is_empty());
        self
    }

    pub fn with_referrer(mut self, referrer: Option<String>) -> Self {
        self.referrer = referrer.filter(|s| !s.is_empty());
        self
    }
}
