//! DirectHttpInvoker -- public hosted endpoints called without the relay.
//!
//! - Hosted text (Pollinations-style): OpenAI-like chat body, answer read
//!   from a JSON body or taken as plain text.
//! - Hosted inference (HuggingFace-style): `{inputs}` body, plus a
//!   `max_new_tokens` length for music, binary answer returned
//!   base64-encoded. An optional bearer token is read per call.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::ExposeSecret;
use serde_json::json;

use switchboard_core::dispatch::invoker::{ProviderInvoker, route_mismatch};
use switchboard_core::dispatch::orchestrator::ASSISTANT_SYSTEM_PROMPT;
use switchboard_core::relay::SecretSource;
use switchboard_types::error::DispatchError;
use switchboard_types::generation::{GenerationOptions, GenerationPayload, GenerationRequest};
use switchboard_types::provider::{ProviderDescriptor, ProviderRoute, Transport};

use super::response::ResponseShape;

const TEXT_SEED: u64 = 42;
const IMAGE_STYLE_SUFFIX: &str = ", cinematic, professional, 8k";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
/// MusicGen emits audio frames at 50 Hz.
const MUSICGEN_TOKENS_PER_SECOND: u32 = 50;

pub struct DirectHttpInvoker {
    client: reqwest::Client,
    secrets: Arc<dyn SecretSource>,
}

impl DirectHttpInvoker {
    pub fn new(client: reqwest::Client, secrets: Arc<dyn SecretSource>) -> Self {
        Self { client, secrets }
    }

    async fn hosted_text(
        &self,
        url: &str,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        let system = request
            .system_prompt
            .as_deref()
            .unwrap_or(ASSISTANT_SYSTEM_PROMPT);
        let body = json!({
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": request.prompt },
            ],
            "model": model,
            "seed": TEXT_SEED,
            "jsonMode": false,
        });

        let response = self
            .client
            .post(url)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("failed to read body: {e}")))?;
        if !status.is_success() {
            return Err(DispatchError::upstream(Some(status.as_u16()), text));
        }

        let content = match ResponseShape::classify(text.clone()) {
            shape @ ResponseShape::Structured(_) => shape
                .text_at(&["/choices/0/message/content", "/response"])
                .unwrap_or(text),
            ResponseShape::Raw(raw) => raw.trim().to_string(),
        };
        if content.trim().is_empty() {
            return Err(DispatchError::parse("empty text response"));
        }
        Ok(GenerationPayload::Text { text: content })
    }

    async fn hosted_inference(
        &self,
        url: &str,
        token_env: Option<&str>,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        let body = match &request.options {
            GenerationOptions::Image(_) => {
                json!({ "inputs": format!("{}{IMAGE_STYLE_SUFFIX}", request.prompt) })
            }
            GenerationOptions::Music(music) => json!({
                "inputs": request.prompt,
                "parameters": {
                    "max_new_tokens": music.duration_secs.saturating_mul(MUSICGEN_TOKENS_PER_SECOND),
                },
            }),
            _ => json!({ "inputs": request.prompt }),
        };

        let mut builder = self.client.post(url).json(&body);
        if let Some(token) = token_env.and_then(|env| self.secrets.get(env)) {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DispatchError::upstream(Some(status.as_u16()), error_body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        if content_type.starts_with("application/json") {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::parse(format!(
                "expected binary content, got JSON: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("failed to read body: {e}")))?;
        if bytes.is_empty() {
            return Err(DispatchError::parse("empty binary response"));
        }
        Ok(GenerationPayload::Binary {
            content_type,
            data: STANDARD.encode(&bytes),
        })
    }
}

impl ProviderInvoker for DirectHttpInvoker {
    fn transport(&self) -> Transport {
        Transport::ClientDirectHttp
    }

    async fn call(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        match &provider.route {
            ProviderRoute::HostedText { url, model } => self.hosted_text(url, model, request).await,
            ProviderRoute::HostedInference { url, token_env } => {
                self.hosted_inference(url, token_env.as_deref(), request)
                    .await
            }
            _ => Err(route_mismatch(Transport::ClientDirectHttp, provider)),
        }
    }
}
