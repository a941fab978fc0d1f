// src/newsletter/mod.rs
//! Newsletter subscription pipeline: validate, stamp provenance, hand off to the provider.

pub mod schema;
pub mod service;
pub mod types;

pub use schema::{validate, validate_email};
pub use service::{ConvertKitClient, DynSubscriptionService, SubscriptionService};
pub use types::{ApiResponse, FieldError, NewSubscriber, Submission, SubscriptionResult};

/// Short, stable id for an email so logs never carry the address itself.
pub(crate) fn anon_id(email: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::anon_id;

    #[test]
    fn anon_id_is_short_and_stable() {
        let a = anon_id("test@example.com");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_id("test@example.com"));
        assert_ne!(a, anon_id("other@example.com"));
    }
}
