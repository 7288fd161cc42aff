//! Scripted upstream for relay tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::error::RelayError;
use super::upstream::{UpstreamClient, UpstreamReply};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: Value,
}

/// Answers with queued replies in order; an empty queue is a transport error.
pub struct MockUpstream {
    replies: Mutex<VecDeque<UpstreamReply>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn new(replies: Vec<UpstreamReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<RecordedRequest>>> {
        self.requests.clone()
    }
}

impl UpstreamClient for MockUpstream {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&SecretString>,
        body: &Value,
    ) -> Result<UpstreamReply, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.map(|b| b.expose_secret().to_string()),
            body: body.clone(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RelayError::Internal("connection refused".to_string()))
    }
}
