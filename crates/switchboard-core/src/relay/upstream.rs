//! Port for the HTTP client relays forward through.

use secrecy::SecretString;
use serde_json::Value;

use super::error::RelayError;

/// Status and body text of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON; an unreadable body is an internal error.
    pub fn json(&self) -> Result<Value, RelayError> {
        serde_json::from_str(&self.body)
            .map_err(|e| RelayError::Internal(format!("invalid upstream JSON: {e}")))
    }
}

/// Sends one JSON POST. Implementations must not retry.
pub trait UpstreamClient: Send + Sync {
    /// POST `body` to `url`, with bearer auth when `bearer` is set.
    ///
    /// Any HTTP status is `Ok`; only transport failures are `Err`.
    fn post_json(
        &self,
        url: &str,
        bearer: Option<&SecretString>,
        body: &Value,
    ) -> impl std::future::Future<Output = Result<UpstreamReply, RelayError>> + Send;
}
