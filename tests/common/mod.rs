// tests/common/mod.rs
// Shared test doubles: a subscription service that records every call.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use stack_junkie::newsletter::{Submission, SubscriptionResult, SubscriptionService};

#[derive(Clone)]
pub enum Reply {
    Result(SubscriptionResult),
    Fail(&'static str),
}

/// Fake provider: returns a canned reply and keeps what it was called with.
#[derive(Clone)]
pub struct RecordingService {
    reply: Reply,
    pub subscribed: Arc<Mutex<Vec<Submission>>>,
    pub unsubscribed: Arc<Mutex<Vec<String>>>,
}

impl RecordingService {
    pub fn replying(reply: Reply) -> Self {
        Self {
            reply,
            subscribed: Arc::new(Mutex::new(Vec::new())),
            unsubscribed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ok(message: &str) -> Self {
        Self::replying(Reply::Result(SubscriptionResult::success(message)))
    }

    fn answer(&self) -> anyhow::Result<SubscriptionResult> {
        match &self.reply {
            Reply::Result(r) => Ok(r.clone()),
            Reply::Fail(msg) => Err(anyhow::anyhow!(*msg)),
        }
    }
}

#[async_trait]
impl SubscriptionService for RecordingService {
    async fn subscribe(&self, submission: &Submission) -> anyhow::Result<SubscriptionResult> {
        self.subscribed.lock().push(submission.clone());
        self.answer()
    }

    async fn unsubscribe(&self, email: &str) -> anyhow::Result<SubscriptionResult> {
        self.unsubscribed.lock().push(email.to_string());
        self.answer()
    }
}
