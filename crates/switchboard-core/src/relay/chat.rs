//! Chat-completions relay (DeepSeek-style upstream).

use serde_json::Value;

use switchboard_types::relay::{ChatCompletionBody, ChatRelayRequest, DEFAULT_CHAT_MODEL};

use super::error::RelayError;
use super::secret::SecretSource;
use super::upstream::UpstreamClient;

const UPSTREAM_LABEL: &str = "DeepSeek";
const DEFAULT_TEMPERATURE: f64 = 1.0;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Forwards chat requests with a bearer secret and returns the upstream
/// JSON untouched.
pub struct ChatRelay<U, S> {
    upstream: U,
    secrets: S,
    base_url: String,
    key_env: String,
}

impl<U: UpstreamClient, S: SecretSource> ChatRelay<U, S> {
    pub fn new(
        upstream: U,
        secrets: S,
        base_url: impl Into<String>,
        key_env: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            secrets,
            base_url: base_url.into(),
            key_env: key_env.into(),
        }
    }

    /// Relay one raw request body.
    pub async fn handle(&self, body: &[u8]) -> Result<Value, RelayError> {
        let Some(key) = self.secrets.get(&self.key_env) else {
            tracing::error!(env = %self.key_env, "Chat relay secret is not set");
            return Err(RelayError::MissingSecret {
                message: format!("{UPSTREAM_LABEL} API key not configured"),
            });
        };

        let request = parse_request(body)?;
        let completion = with_defaults(request);
        let payload = serde_json::to_value(&completion)
            .map_err(|e| RelayError::Internal(format!("failed to encode request: {e}")))?;

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        tracing::debug!(
            model = %completion.model,
            messages = completion.messages.len(),
            "Forwarding chat completion"
        );
        let reply = self.upstream.post_json(&url, Some(&key), &payload).await?;

        if !reply.is_success() {
            tracing::warn!(status = reply.status, "Chat upstream returned an error");
            return Err(RelayError::Upstream {
                upstream: UPSTREAM_LABEL,
                status: reply.status,
                details: reply.body,
            });
        }
        reply.json()
    }
}

fn parse_request(body: &[u8]) -> Result<ChatRelayRequest, RelayError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::Validation(format!("Invalid JSON body: {e}")))?;

    match value.get("messages") {
        Some(Value::Array(messages)) if !messages.is_empty() => {}
        _ => return Err(RelayError::Validation("Messages array is required".to_string())),
    }

    serde_json::from_value(value)
        .map_err(|e| RelayError::Validation(format!("Invalid request body: {e}")))
}

/// Responses are always requested whole; streaming is not relayed.
fn with_defaults(request: ChatRelayRequest) -> ChatCompletionBody {
    if request.stream == Some(true) {
        tracing::debug!("Streaming requested; relaying a complete response instead");
    }
    ChatCompletionBody {
        model: request
            .model
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        messages: request.messages.unwrap_or_default(),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        stream: false,
    }
}
