// src/newsletter/schema.rs
//! Validation and normalization of newsletter form input.
//!
//! Validation never short-circuits: every violated rule is reported so the
//! form can show all problems at once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::types::{FieldError, NewSubscriber};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MSG_EXPECTED_STRING: &str = "Expected string";
pub const MSG_NAME_TOO_SHORT: &str = "Name must be at least 2 characters long";
pub const MSG_NAME_TOO_LONG: &str = "Name must not exceed 100 characters";

// dot-atom local part, '@', dot-separated labels ending in an alphabetic TLD
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    ))
    .expect("email regex")
});

/// Grammar check only; callers trim first.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// Validate a raw subscription body (`{ email, name? }`).
pub fn validate(raw: &Value) -> Result<NewSubscriber, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = check_email(raw.get("email"), &mut errors);
    let name = check_name(raw.get("name"), &mut errors);

    match email {
        Some(email) if errors.is_empty() => Ok(NewSubscriber { email, name }),
        _ => Err(errors),
    }
}

/// Validate a body that only carries `email` (unsubscribe).
pub fn validate_email(raw: &Value) -> Result<String, Vec<FieldError>> {
    let mut errors = Vec::new();
    match check_email(raw.get("email"), &mut errors) {
        Some(email) => Ok(email),
        None => Err(errors),
    }
}

fn check_email(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let raw = match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("email", MSG_EMAIL_REQUIRED));
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            errors.push(FieldError::new("email", MSG_EXPECTED_STRING));
            return None;
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("email", MSG_EMAIL_REQUIRED));
        return None;
    }
    if !is_valid_email(trimmed) {
        errors.push(FieldError::new("email", MSG_EMAIL_INVALID));
        return None;
    }
    Some(trimmed.to_lowercase())
}

fn check_name(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let raw = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) => s,
        Some(_) => {
            errors.push(FieldError::new("name", MSG_EXPECTED_STRING));
            return None;
        }
    };

    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(FieldError::new("name", MSG_NAME_TOO_SHORT));
        return None;
    }
    if len > NAME_MAX_CHARS {
        errors.push(FieldError::new("name", MSG_NAME_TOO_LONG));
        return None;
    }
    Some(trimmed.to_string())
}
