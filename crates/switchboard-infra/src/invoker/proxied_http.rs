//! ProxiedHttpInvoker -- calls the local relay endpoints.
//!
//! The relay attaches the provider secret server-side, so this invoker
//! never handles keys. The chat relay speaks the chat-completions schema;
//! the multimodal relay takes a single prompt string.

use serde_json::{Value, json};

use switchboard_core::dispatch::invoker::{ProviderInvoker, route_mismatch};
use switchboard_core::relay::RelayError;
use switchboard_types::error::DispatchError;
use switchboard_types::generation::{
    GenerationOptions, GenerationPayload, GenerationRequest, ScriptOptions,
};
use switchboard_types::provider::{ProviderDescriptor, ProviderRoute, Transport};
use switchboard_types::relay::ChatMessage;

pub struct ProxiedHttpInvoker {
    client: reqwest::Client,
    relay_base_url: String,
}

impl ProxiedHttpInvoker {
    pub fn new(client: reqwest::Client, relay_base_url: String) -> Self {
        Self {
            client,
            relay_base_url: relay_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.relay_base_url, path.trim_start_matches('/'))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, DispatchError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("relay request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::upstream(None, format!("failed to read relay body: {e}")))?;
        if !status.is_success() {
            let status = status.as_u16();
            return Err(match RelayError::from_reply(status, &text) {
                Some(rejection) => DispatchError::from(rejection),
                None => DispatchError::upstream(Some(status), text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| DispatchError::parse(format!("relay returned invalid JSON: {e}")))
    }
}

fn script_options(request: &GenerationRequest) -> ScriptOptions {
    match &request.options {
        GenerationOptions::Script(opts) => opts.clone(),
        _ => ScriptOptions::default(),
    }
}

fn non_empty_text(value: Option<&Value>, what: &str) -> Result<GenerationPayload, DispatchError> {
    match value.and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(GenerationPayload::Text {
            text: text.to_string(),
        }),
        _ => Err(DispatchError::parse(format!("relay response has no {what}"))),
    }
}

impl ProviderInvoker for ProxiedHttpInvoker {
    fn transport(&self) -> Transport {
        Transport::ServerProxiedHttp
    }

    async fn call(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        let opts = script_options(request);
        match &provider.route {
            ProviderRoute::ChatRelay { path, model } => {
                let mut messages = Vec::with_capacity(2);
                if let Some(system) = &request.system_prompt {
                    messages.push(ChatMessage::new("system", system.as_str()));
                }
                messages.push(ChatMessage::new("user", request.prompt.as_str()));

                let body = json!({
                    "messages": messages,
                    "model": model,
                    "temperature": opts.temperature,
                    "max_tokens": opts.max_tokens,
                });
                let reply = self.post(path, &body).await?;
                non_empty_text(reply.pointer("/choices/0/message/content"), "choices[0].message.content")
            }
            ProviderRoute::MultimodalRelay { path, model } => {
                let body = json!({
                    "prompt": request.composed_prompt(),
                    "model": model,
                    "temperature": opts.temperature,
                    "maxOutputTokens": opts.max_tokens,
                });
                let reply = self.post(path, &body).await?;
                non_empty_text(reply.get("response"), "response text")
            }
            _ => Err(route_mismatch(Transport::ServerProxiedHttp, provider)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use chrono::NaiveDate;
    use switchboard_core::dispatch::box_invoker::InvokerSet;
    use switchboard_core::dispatch::builtin;
    use switchboard_core::dispatch::clock::ManualClock;
    use switchboard_core::dispatch::orchestrator::DispatchOrchestrator;
    use switchboard_core::dispatch::registry::ProviderRegistry;
    use switchboard_types::capability::Capability;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn descriptor(route: ProviderRoute) -> ProviderDescriptor {
        ProviderDescriptor {
            name: "Relay".into(),
            route,
            daily_limit: Default::default(),
            quality: Default::default(),
            speed: Default::default(),
        }
    }

    fn chat_route() -> ProviderRoute {
        ProviderRoute::ChatRelay {
            path: "/api/deepseek".into(),
            model: "deepseek-chat".into(),
        }
    }

    fn multimodal_route() -> ProviderRoute {
        ProviderRoute::MultimodalRelay {
            path: "/api/gemini".into(),
            model: "gemini-2.0-flash-exp".into(),
        }
    }

    fn relay_router() -> Router {
        Router::new()
            .route(
                "/api/deepseek",
                post(|axum::Json(body): axum::Json<Value>| async move {
                    assert_eq!(body["model"], "deepseek-chat");
                    assert_eq!(body["max_tokens"], 4096);
                    let roles: Vec<&str> = body["messages"]
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|m| m["role"].as_str().unwrap())
                        .collect();
                    let last = body["messages"].as_array().unwrap().last().unwrap()["content"]
                        .as_str()
                        .unwrap()
                        .to_string();
                    axum::Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": format!("{} / {last}", roles.join(","))}}]
                    }))
                }),
            )
            .route(
                "/api/gemini",
                post(|axum::Json(body): axum::Json<Value>| async move {
                    assert_eq!(body["maxOutputTokens"], 4096);
                    axum::Json(json!({
                        "response": body["prompt"],
                        "model": body["model"],
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn test_chat_relay_sends_system_and_user_messages() {
        let base = serve(relay_router()).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);
        let request = GenerationRequest::script("hello").with_system_prompt("Be brief.");

        let payload = invoker.call(&descriptor(chat_route()), &request).await.unwrap();
        assert_eq!(
            payload,
            GenerationPayload::Text {
                text: "system,user / hello".into()
            }
        );

        let payload = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hi"))
            .await
            .unwrap();
        assert_eq!(payload, GenerationPayload::Text { text: "user / hi".into() });
    }

    #[tokio::test]
    async fn test_multimodal_relay_sends_composed_prompt() {
        let base = serve(relay_router()).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);
        let request = GenerationRequest::script("hello").with_system_prompt("Be brief.");

        let payload = invoker
            .call(&descriptor(multimodal_route()), &request)
            .await
            .unwrap();
        assert_eq!(
            payload,
            GenerationPayload::Text {
                text: "Be brief.\n\nUser: hello".into()
            }
        );
    }

    fn failing_relay(status: StatusCode, body: Value) -> Router {
        Router::new().route(
            "/api/deepseek",
            post(move || async move { (status, axum::Json(body)) }),
        )
    }

    #[tokio::test]
    async fn test_relay_missing_secret_is_configuration_error() {
        let router = failing_relay(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "DeepSeek API key not configured"}),
        );
        let base = serve(router).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);

        let err = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hello"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::configuration("DeepSeek API key not configured")
        );
        assert!(!err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_relay_validation_reply_is_validation_error() {
        let router = failing_relay(
            StatusCode::BAD_REQUEST,
            json!({"error": "Messages array is required"}),
        );
        let base = serve(router).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);

        let err = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation { .. }));
        assert!(!err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_forwarded_upstream_failure_is_upstream_error() {
        let router = failing_relay(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"status": 429, "error": "DeepSeek API request failed", "details": "rate limited"}),
        );
        let base = serve(router).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);

        let err = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hello"))
            .await
            .unwrap_err();
        match &err {
            DispatchError::Upstream { status, message } => {
                assert_eq!(*status, Some(429));
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(err.is_fallback_eligible());
    }

    struct CountingFallback(Arc<AtomicUsize>);

    impl ProviderInvoker for CountingFallback {
        fn transport(&self) -> Transport {
            Transport::ClientDirectHttp
        }

        async fn call(
            &self,
            _provider: &ProviderDescriptor,
            _request: &GenerationRequest,
        ) -> Result<GenerationPayload, DispatchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(GenerationPayload::Text { text: "fallback".into() })
        }
    }

    #[tokio::test]
    async fn test_relay_without_secret_does_not_trigger_fallback() {
        let router = failing_relay(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "DeepSeek API key not configured"}),
        );
        let base = serve(router).await;
        let fallback_calls = Arc::new(AtomicUsize::new(0));

        let mut table = builtin::capability_table();
        for entry in &mut table {
            if entry.capability == Capability::Script {
                entry.providers = vec![
                    ProviderDescriptor {
                        name: "DeepSeek Chat".into(),
                        ..descriptor(chat_route())
                    },
                    ProviderDescriptor {
                        name: "Pollinations AI".into(),
                        ..descriptor(ProviderRoute::HostedText {
                            url: "https://text.example/".into(),
                            model: "openai".into(),
                        })
                    },
                ];
                entry.fallback = "Pollinations AI".into();
            }
        }
        let registry = ProviderRegistry::new(table).unwrap();
        let invokers = InvokerSet::new()
            .with(ProxiedHttpInvoker::new(reqwest::Client::new(), base))
            .with(CountingFallback(fallback_calls.clone()));
        let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()));
        let orch = DispatchOrchestrator::new(registry, invokers, clock);

        let result = orch.invoke(&GenerationRequest::script("hi")).await;
        assert!(!result.is_success());
        assert_eq!(result.provider(), "DeepSeek Chat");
        assert!(matches!(
            result.error(),
            Some(DispatchError::Configuration { .. })
        ));
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_choices_is_parse_error() {
        let router = Router::new().route(
            "/api/deepseek",
            post(|| async { axum::Json(json!({"choices": []})) }),
        );
        let base = serve(router).await;
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), base);

        let err = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Parse { .. }));
        assert!(err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_upstream_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), format!("http://{addr}"));
        let err = invoker
            .call(&descriptor(chat_route()), &GenerationRequest::script("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Upstream { status: None, .. }));
    }

    #[tokio::test]
    async fn test_template_route_is_configuration_error() {
        let invoker = ProxiedHttpInvoker::new(reqwest::Client::new(), "http://127.0.0.1:1".into());
        let route = ProviderRoute::ImageTemplate {
            base_url: "https://image.example".into(),
        };
        let err = invoker
            .call(&descriptor(route), &GenerationRequest::image("fox"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Configuration { .. }));
    }
}
