//! Multimodal relay (Gemini-style upstream).
//!
//! Accepts a prompt with optional inline images, forwards it with the
//! secret as a query parameter, and normalises the first candidate into a
//! [`MultimodalRelayResponse`]. When the model answers with a function call
//! the function runs locally and exactly one follow-up request carries its
//! result back.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;

use switchboard_types::relay::{MultimodalRelayRequest, MultimodalRelayResponse, NO_RESPONSE_TEXT};

use super::error::RelayError;
use super::secret::SecretSource;
use super::upstream::UpstreamClient;
use crate::functions;

const UPSTREAM_LABEL: &str = "Gemini";
const DEFAULT_MIME_TYPE: &str = "image/jpeg";
const DEFAULT_TEMPERATURE: f64 = 1.0;
const DEFAULT_TOP_K: u32 = 40;
const DEFAULT_TOP_P: f64 = 0.95;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

pub struct MultimodalRelay<U, S> {
    upstream: U,
    secrets: S,
    base_url: String,
    key_env: String,
}

impl<U: UpstreamClient, S: SecretSource> MultimodalRelay<U, S> {
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
    pub async fn handle(&self, body: &[u8]) -> Result<MultimodalRelayResponse, RelayError> {
        let Some(key) = self.secrets.get(&self.key_env) else {
            tracing::error!(env = %self.key_env, "Multimodal relay secret is not set");
            return Err(RelayError::MissingSecret {
                message: format!("{UPSTREAM_LABEL} API key not configured"),
            });
        };

        let request = parse_request(body)?;
        let prompt = request.prompt.as_deref().unwrap_or_default();
        let model = request.model_or_default().to_string();
        let url = endpoint_url(&self.base_url, &model, &key)?;

        let parts = user_parts(prompt, &request);
        let generation_config = generation_config(&request);
        let tools = request
            .function_calling
            .then(|| json!([{ "function_declarations": functions::declarations() }]));

        let mut payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        });
        if let Some(tools) = &tools {
            payload["tools"] = tools.clone();
        }

        tracing::debug!(
            %model,
            images = request.images.len(),
            function_calling = request.function_calling,
            code_execution = request.code_execution,
            "Forwarding multimodal request"
        );
        let data = self.post(&url, &payload).await?;
        let candidate_parts = first_candidate_parts(&data);

        if let Some(call) = candidate_parts
            .iter()
            .find_map(|p| p.get("functionCall"))
            .cloned()
        {
            let name = call.get("name").and_then(Value::as_str).unwrap_or_default();
            let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
            tracing::info!(function = name, "Executing requested function");
            let result = functions::execute(name, &args);

            let mut follow_up = json!({
                "contents": [
                    { "role": "user", "parts": parts },
                    { "role": "model", "parts": [{ "functionCall": call }] },
                    { "role": "user", "parts": [{
                        "functionResponse": { "name": name, "response": result }
                    }] },
                ],
                "generationConfig": generation_config,
            });
            if let Some(tools) = tools {
                follow_up["tools"] = tools;
            }

            let final_data = self.post(&url, &follow_up).await?;
            return Ok(MultimodalRelayResponse {
                response: first_text(&first_candidate_parts(&final_data)),
                model,
                usage: final_data.get("usageMetadata").cloned(),
                executable_code: None,
                code_execution_result: None,
                function_call: Some(call),
                function_result: Some(result),
            });
        }

        Ok(MultimodalRelayResponse {
            response: first_text(&candidate_parts),
            model,
            usage: data.get("usageMetadata").cloned(),
            executable_code: find_part(&candidate_parts, "executableCode"),
            code_execution_result: find_part(&candidate_parts, "codeExecutionResult"),
            function_call: None,
            function_result: None,
        })
    }

    async fn post(&self, url: &Url, body: &Value) -> Result<Value, RelayError> {
        let reply = self.upstream.post_json(url.as_str(), None, body).await?;
        if !reply.is_success() {
            tracing::warn!(status = reply.status, "Multimodal upstream returned an error");
            return Err(RelayError::Upstream {
                upstream: UPSTREAM_LABEL,
                status: reply.status,
                details: reply.body,
            });
        }
        reply.json()
    }
}

/// `{base}/models/{model}:generateContent?key=...` with the key form-encoded.
fn endpoint_url(base_url: &str, model: &str, key: &SecretString) -> Result<Url, RelayError> {
    let endpoint = format!(
        "{}/models/{model}:generateContent",
        base_url.trim_end_matches('/')
    );
    let mut url = Url::parse(&endpoint)
        .map_err(|e| RelayError::Internal(format!("invalid upstream URL: {e}")))?;
    url.query_pairs_mut().append_pair("key", key.expose_secret());
    Ok(url)
}

fn parse_request(body: &[u8]) -> Result<MultimodalRelayRequest, RelayError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::Validation(format!("Invalid JSON body: {e}")))?;

    let has_prompt = value
        .get("prompt")
        .and_then(Value::as_str)
        .is_some_and(|p| !p.trim().is_empty());
    if !has_prompt {
        return Err(RelayError::Validation("Prompt is required".to_string()));
    }

    let request: MultimodalRelayRequest = serde_json::from_value(value)
        .map_err(|e| RelayError::Validation(format!("Invalid request body: {e}")))?;

    if !request
        .model_or_default()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-._".contains(c))
    {
        return Err(RelayError::Validation("Invalid model name".to_string()));
    }

    for (i, image) in request.images.iter().enumerate() {
        if STANDARD.decode(image.data.as_bytes()).is_err() {
            return Err(RelayError::Validation(format!(
                "Image {i} is not valid base64 data"
            )));
        }
    }
    Ok(request)
}

fn user_parts(prompt: &str, request: &MultimodalRelayRequest) -> Vec<Value> {
    let mut parts = vec![json!({ "text": prompt })];
    parts.extend(request.images.iter().map(|image| {
        json!({
            "inline_data": {
                "mime_type": image.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE),
                "data": image.data,
            }
        })
    }));
    parts
}

fn generation_config(request: &MultimodalRelayRequest) -> Value {
    let mut config = json!({
        "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        "topK": request.top_k.unwrap_or(DEFAULT_TOP_K),
        "topP": request.top_p.unwrap_or(DEFAULT_TOP_P),
        "maxOutputTokens": request.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
    });
    if request.code_execution {
        config["code_execution"] = json!({});
    }
    config
}

fn first_candidate_parts(data: &Value) -> Vec<Value> {
    data.pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn first_text(parts: &[Value]) -> String {
    parts
        .iter()
        .find_map(|p| p.get("text").and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_RESPONSE_TEXT)
        .to_string()
}

fn find_part(parts: &[Value], key: &str) -> Option<Value> {
    parts.iter().find_map(|p| p.get(key)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use crate::relay::secret::StaticSecrets;
    use crate::relay::test_support::MockUpstream;
    use crate::relay::upstream::UpstreamReply;

    const KEY_ENV: &str = "GEMINI_API_KEY";

    fn relay(upstream: MockUpstream) -> MultimodalRelay<MockUpstream, StaticSecrets> {
        MultimodalRelay::new(
            upstream,
            StaticSecrets::new().with(KEY_ENV, "g-key"),
            "https://gemini.example/v1beta",
            KEY_ENV,
        )
    }

    fn ok(body: Value) -> UpstreamReply {
        UpstreamReply {
            status: 200,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_prompt_is_400() {
        for body in [r#"{}"#, r#"{"prompt": "  "}"#, r#"{"prompt": 7}"#] {
            let upstream = MockUpstream::new(vec![]);
            let calls = upstream.calls();
            let err = relay(upstream).handle(body.as_bytes()).await.unwrap_err();
            assert_eq!(err.status_code(), 400, "{body}");
            assert_eq!(err.body(), json!({"error": "Prompt is required"}));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_invalid_base64_image_is_400() {
        let err = relay(MockUpstream::new(vec![]))
            .handle(br#"{"prompt":"describe","images":[{"data":"***not base64***"}]}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_model_with_path_characters_is_400() {
        let err = relay(MockUpstream::new(vec![]))
            .handle(br#"{"prompt":"hi","model":"../admin?x="}"#)
            .await
            .unwrap_err();
        assert_eq!(err.body(), json!({"error": "Invalid model name"}));
    }

    #[tokio::test]
    async fn test_missing_secret_is_500() {
        let relay = MultimodalRelay::new(
            MockUpstream::new(vec![]),
            StaticSecrets::new(),
            "https://gemini.example/v1beta",
            KEY_ENV,
        );
        let err = relay.handle(br#"{"prompt":"hi"}"#).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.body(), json!({"error": "Gemini API key not configured"}));
    }

    #[tokio::test]
    async fn test_key_with_reserved_characters_is_encoded() {
        let upstream = MockUpstream::new(vec![ok(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        }))]);
        let requests = upstream.requests();
        let relay = MultimodalRelay::new(
            upstream,
            StaticSecrets::new().with(KEY_ENV, "a&b#c+d"),
            "https://gemini.example/v1beta/",
            KEY_ENV,
        );

        relay.handle(br#"{"prompt":"hi"}"#).await.unwrap();
        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].url,
            "https://gemini.example/v1beta/models/gemini-2.0-flash-exp:generateContent?key=a%26b%23c%2Bd"
        );
    }

    #[tokio::test]
    async fn test_text_response_with_defaults() {
        let upstream = MockUpstream::new(vec![ok(json!({
            "candidates": [{"content": {"parts": [{"text": "A cat on a mat."}]}}],
            "usageMetadata": {"totalTokenCount": 12}
        }))]);
        let requests = upstream.requests();

        let response = relay(upstream)
            .handle(br#"{"prompt":"describe","images":[{"data":"aGVsbG8="}],"codeExecution":true}"#)
            .await
            .unwrap();
        assert_eq!(response.response, "A cat on a mat.");
        assert_eq!(response.model, "gemini-2.0-flash-exp");
        assert_eq!(response.usage, Some(json!({"totalTokenCount": 12})));
        assert!(response.function_call.is_none());

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].url,
            "https://gemini.example/v1beta/models/gemini-2.0-flash-exp:generateContent?key=g-key"
        );
        assert!(requests[0].bearer.is_none());
        let body = &requests[0].body;
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(body["generationConfig"]["code_execution"], json!({}));
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/jpeg"
        );
        assert!(body.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_code_execution_parts_are_returned() {
        let upstream = MockUpstream::new(vec![ok(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Computing."},
                {"executableCode": {"language": "PYTHON", "code": "print(2+2)"}},
                {"codeExecutionResult": {"outcome": "OUTCOME_OK", "output": "4"}}
            ]}}]
        }))]);
        let response = relay(upstream)
            .handle(br#"{"prompt":"what is 2+2","codeExecution":true}"#)
            .await
            .unwrap();
        assert_eq!(response.executable_code.unwrap()["code"], "print(2+2)");
        assert_eq!(response.code_execution_result.unwrap()["output"], "4");
    }

    #[tokio::test]
    async fn test_function_call_makes_exactly_two_upstream_calls() {
        let upstream = MockUpstream::new(vec![
            ok(json!({
                "candidates": [{"content": {"parts": [
                    {"functionCall": {"name": "get_weather", "args": {"location": "Paris"}}}
                ]}}]
            })),
            ok(json!({
                "candidates": [{"content": {"parts": [{"text": "It's 72F and partly cloudy in Paris."}]}}],
                "usageMetadata": {"totalTokenCount": 40}
            })),
        ]);
        let calls = upstream.calls();
        let requests = upstream.requests();

        let response = relay(upstream)
            .handle(br#"{"prompt":"Weather in Paris?","functionCalling":true}"#)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.response, "It's 72F and partly cloudy in Paris.");
        assert_eq!(response.function_call.unwrap()["name"], "get_weather");
        let result = response.function_result.unwrap();
        assert_eq!(result["location"], "Paris");
        assert_eq!(result["temperature"], 72);
        assert_eq!(response.usage, Some(json!({"totalTokenCount": 40})));

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].body["tools"][0]["function_declarations"][0]["name"],
            "get_weather"
        );
        let contents = requests[1].body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "get_weather");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["humidity"],
            65
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_placeholder() {
        let upstream = MockUpstream::new(vec![ok(json!({"candidates": []}))]);
        let response = relay(upstream).handle(br#"{"prompt":"hi"}"#).await.unwrap();
        assert_eq!(response.response, NO_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_upstream_error_mirrors_status() {
        let upstream = MockUpstream::new(vec![UpstreamReply {
            status: 403,
            body: "API key invalid".into(),
        }]);
        let err = relay(upstream).handle(br#"{"prompt":"hi"}"#).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.body()["error"], "Gemini API request failed");
        assert_eq!(err.body()["details"], "API key invalid");
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal_error() {
        let err = relay(MockUpstream::new(vec![]))
            .handle(br#"{"prompt":"hi"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.body()["error"], "Internal server error");
    }
}
