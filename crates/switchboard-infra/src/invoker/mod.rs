//! One [`ProviderInvoker`](switchboard_core::dispatch::invoker::ProviderInvoker)
//! per transport.

pub mod direct_http;
pub mod proxied_http;
pub mod response;
pub mod url_template;

use std::sync::Arc;

use switchboard_core::dispatch::box_invoker::InvokerSet;
use switchboard_core::relay::SecretSource;
use switchboard_types::config::SwitchboardConfig;

pub use direct_http::DirectHttpInvoker;
pub use proxied_http::ProxiedHttpInvoker;
pub use url_template::UrlTemplateInvoker;

/// Invokers for every transport, sharing one HTTP client.
pub fn build_invokers(
    config: &SwitchboardConfig,
    client: reqwest::Client,
    secrets: Arc<dyn SecretSource>,
) -> InvokerSet {
    InvokerSet::new()
        .with(DirectHttpInvoker::new(client.clone(), secrets))
        .with(ProxiedHttpInvoker::new(client, config.relay_base_url()))
        .with(UrlTemplateInvoker::new())
}
