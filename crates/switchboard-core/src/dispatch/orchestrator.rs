//! Dispatch orchestrator.
//!
//! Picks the first provider with budget left, calls it through the invoker
//! registered for its transport, and on a transient failure tries the
//! capability's designated fallback exactly once.
//!
//! Usage counters sit behind a `std::sync::Mutex` that is only held for
//! bookkeeping, never across a provider call. Two concurrent invokes can
//! therefore both pass the quota check for a provider's last slot; the
//! counter then ends one past the limit until the next daily reset.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Instrument;

use switchboard_types::capability::Capability;
use switchboard_types::config::TimeoutConfig;
use switchboard_types::error::DispatchError;
use switchboard_types::generation::{
    GenerationOptions, GenerationPayload, GenerationRequest, GenerationResult, ImageOptions,
    NO_PROVIDER,
};
use switchboard_types::provider::ProviderDescriptor;
use switchboard_types::usage::UsageSnapshot;

use super::box_invoker::InvokerSet;
use super::clock::Clock;
use super::registry::ProviderRegistry;
use super::usage::UsageTracker;
use crate::prompt::{CREATIVE_DIRECTOR_SYSTEM_PROMPT, CampaignBrief, build_script_prompt};

/// System prompt used by [`DispatchOrchestrator::chat`] when none is given.
pub const ASSISTANT_SYSTEM_PROMPT: &str =
    "You are Nexus, an advanced AI assistant. Be helpful, concise, and intelligent.";

/// Routes generation requests to providers with quota accounting and a
/// single fallback hop.
///
/// Shared as `Arc<DispatchOrchestrator>`; all methods take `&self`.
pub struct DispatchOrchestrator {
    registry: ProviderRegistry,
    invokers: InvokerSet,
    usage: Mutex<UsageTracker>,
    clock: Arc<dyn Clock>,
    timeouts: TimeoutConfig,
}

impl DispatchOrchestrator {
    pub fn new(registry: ProviderRegistry, invokers: InvokerSet, clock: Arc<dyn Clock>) -> Self {
        let usage = UsageTracker::new(clock.today());
        Self {
            registry,
            invokers,
            usage: Mutex::new(usage),
            clock,
            timeouts: TimeoutConfig::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Today's counters alongside every provider's limit.
    pub fn usage_snapshot(&self) -> UsageSnapshot {
        let today = self.clock.today();
        let mut usage = self.lock_usage();
        usage.reset_if_new_day(today);
        usage.snapshot(self.registry.limits())
    }

    /// Dispatch one request.
    ///
    /// Never panics and never returns `Err`: every outcome is a
    /// [`GenerationResult`] naming the provider that produced it.
    pub async fn invoke(&self, request: &GenerationRequest) -> GenerationResult {
        let capability = request.capability();
        let span = tracing::info_span!(
            "dispatch.invoke",
            dispatch.capability = %capability,
            dispatch.provider = tracing::field::Empty,
            dispatch.fallback = false,
        );
        self.invoke_inner(capability, request)
            .instrument(span)
            .await
    }

    async fn invoke_inner(
        &self,
        capability: Capability,
        request: &GenerationRequest,
    ) -> GenerationResult {
        if request.prompt.trim().is_empty() {
            return GenerationResult::failure(
                NO_PROVIDER,
                DispatchError::validation("prompt must not be empty"),
            );
        }

        let Some(selected) = self.select(capability) else {
            tracing::warn!(%capability, "All providers have reached their daily limit");
            return GenerationResult::failure(
                NO_PROVIDER,
                DispatchError::QuotaExhausted { capability },
            );
        };
        tracing::Span::current().record("dispatch.provider", selected.name.as_str());

        let err = match self.attempt(&selected, request).await {
            Ok(payload) => return self.succeed(&selected.name, payload),
            Err(err) => err,
        };

        if !err.is_fallback_eligible() {
            tracing::error!(
                provider = %selected.name,
                error = %err,
                "Non-fallback error, returning immediately"
            );
            return GenerationResult::failure(selected.name, err);
        }

        let fallback = match self.registry.designated_fallback(capability) {
            Some(fallback) if fallback.name != selected.name => fallback,
            _ => {
                tracing::warn!(
                    provider = %selected.name,
                    error = %err,
                    "Designated fallback failed, no further attempts"
                );
                return GenerationResult::failure(selected.name, err);
            }
        };

        if !self.lock_usage().remaining(fallback) {
            tracing::warn!(
                provider = %selected.name,
                fallback = %fallback.name,
                "Fallback has no budget left today"
            );
            return GenerationResult::failure(selected.name, err);
        }

        tracing::warn!(
            provider = %selected.name,
            fallback = %fallback.name,
            error = %err,
            "{} failed, trying {}",
            selected.name,
            fallback.name
        );
        let span = tracing::Span::current();
        span.record("dispatch.provider", fallback.name.as_str());
        span.record("dispatch.fallback", true);

        match self.attempt(fallback, request).await {
            Ok(payload) => self.succeed(&fallback.name, payload),
            Err(fallback_err) => {
                tracing::warn!(
                    provider = %fallback.name,
                    error = %fallback_err,
                    "Fallback failed"
                );
                GenerationResult::failure(fallback.name.clone(), fallback_err)
            }
        }
    }

    /// Reset counters if the date moved, then pick the first provider with
    /// budget left.
    fn select(&self, capability: Capability) -> Option<ProviderDescriptor> {
        let today = self.clock.today();
        let mut usage = self.lock_usage();
        if usage.reset_if_new_day(today) {
            tracing::info!(%today, "Daily usage counters reset");
        }
        self.registry
            .providers_for(capability)
            .iter()
            .find(|p| {
                let ok = usage.remaining(p);
                if !ok {
                    tracing::debug!(provider = %p.name, "Daily limit reached, skipping");
                }
                ok
            })
            .cloned()
    }

    /// One call, bounded by the transport's deadline.
    async fn attempt(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        let transport = provider.transport();
        let invoker = self.invokers.get(transport).ok_or_else(|| {
            DispatchError::configuration(format!("no invoker registered for {transport} transport"))
        })?;

        let deadline = self.timeouts.for_transport(transport);
        tracing::debug!(provider = %provider.name, %transport, ?deadline, "Invoking provider");
        match tokio::time::timeout(deadline, invoker.call(provider, request)).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::upstream(
                None,
                format!("{} timed out after {}s", provider.name, deadline.as_secs()),
            )),
        }
    }

    fn succeed(&self, provider: &str, payload: GenerationPayload) -> GenerationResult {
        self.lock_usage().record_use(provider);
        tracing::info!(provider, "Dispatch succeeded");
        GenerationResult::success(provider, payload)
    }

    fn lock_usage(&self) -> MutexGuard<'_, UsageTracker> {
        self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Conversational reply on the script capability.
    pub async fn chat(&self, message: &str, system_prompt: Option<&str>) -> GenerationResult {
        let request = GenerationRequest::script(message)
            .with_system_prompt(system_prompt.unwrap_or(ASSISTANT_SYSTEM_PROMPT));
        self.invoke(&request).await
    }

    /// Four-scene ad script for a campaign brief.
    pub async fn generate_script(&self, brief: &CampaignBrief) -> GenerationResult {
        let request = GenerationRequest::script(build_script_prompt(brief))
            .with_system_prompt(CREATIVE_DIRECTOR_SYSTEM_PROMPT);
        self.invoke(&request).await
    }

    /// Image with the default dimensions and an optional fixed seed.
    pub async fn generate_image(&self, prompt: &str, seed: Option<u64>) -> GenerationResult {
        let request = GenerationRequest::new(
            prompt,
            GenerationOptions::Image(ImageOptions {
                seed,
                ..ImageOptions::default()
            }),
        );
        self.invoke(&request).await
    }
}
