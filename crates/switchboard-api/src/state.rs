//! Application state wiring the orchestrator and relays together.
//!
//! AppState holds the concrete instances used by both CLI and REST API.
//! The relays are generic over upstream/secret ports; here they are pinned
//! to the reqwest upstream and a shared secret source.

use std::sync::Arc;

use switchboard_core::dispatch::clock::{Clock, SystemClock};
use switchboard_core::dispatch::orchestrator::DispatchOrchestrator;
use switchboard_core::dispatch::registry::ProviderRegistry;
use switchboard_core::relay::{ChatRelay, MultimodalRelay, SecretSource};
use switchboard_infra::client::build_http_client;
use switchboard_infra::invoker::build_invokers;
use switchboard_infra::relay::HttpUpstream;
use switchboard_infra::secret::EnvSecrets;
use switchboard_types::config::SwitchboardConfig;

/// Secret lookup shared by the invokers and both relays.
pub type SharedSecrets = Arc<dyn SecretSource>;

pub type ConcreteChatRelay = ChatRelay<HttpUpstream, SharedSecrets>;
pub type ConcreteMultimodalRelay = MultimodalRelay<HttpUpstream, SharedSecrets>;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DispatchOrchestrator>,
    pub chat_relay: Arc<ConcreteChatRelay>,
    pub multimodal_relay: Arc<ConcreteMultimodalRelay>,
    pub config: Arc<SwitchboardConfig>,
}

impl AppState {
    /// Production wiring: secrets from the environment, wall-clock dates.
    pub fn init(config: SwitchboardConfig) -> anyhow::Result<Self> {
        Self::build(config, Arc::new(EnvSecrets::new()), Arc::new(SystemClock))
    }

    pub fn build(
        config: SwitchboardConfig,
        secrets: SharedSecrets,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_config(&config)?;
        let client = build_http_client()?;

        let invokers = build_invokers(&config, client.clone(), secrets.clone());
        tracing::debug!(transports = ?invokers.transports(), "Invokers registered");
        let orchestrator =
            DispatchOrchestrator::new(registry, invokers, clock).with_timeouts(config.timeouts.clone());

        let chat_relay = ChatRelay::new(
            HttpUpstream::new(client.clone()),
            secrets.clone(),
            config.relay.deepseek_base_url.clone(),
            config.relay.deepseek_key_env.clone(),
        );
        let multimodal_relay = MultimodalRelay::new(
            HttpUpstream::new(client),
            secrets,
            config.relay.gemini_base_url.clone(),
            config.relay.gemini_key_env.clone(),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            chat_relay: Arc::new(chat_relay),
            multimodal_relay: Arc::new(multimodal_relay),
            config: Arc::new(config),
        })
    }
}
