//! reqwest implementation of the relay upstream port.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use switchboard_core::relay::{RelayError, UpstreamClient, UpstreamReply};

/// Sends relay requests upstream. Any HTTP status is passed back to the
/// relay; only connection-level failures become errors.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl UpstreamClient for HttpUpstream {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&SecretString>,
        body: &Value,
    ) -> Result<UpstreamReply, RelayError> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }

        // The URL may carry a key in its query string, so only errors
        // stripped of it are surfaced.
        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Internal(format!("upstream request failed: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Internal(format!("failed to read upstream body: {}", e.without_url())))?;

        Ok(UpstreamReply { status, body })
    }
}
