//! ProviderInvoker trait definition.
//!
//! One implementation exists per [`Transport`]; the descriptor passed to
//! `call` carries the concrete endpoint.

use switchboard_types::error::DispatchError;
use switchboard_types::generation::{GenerationPayload, GenerationRequest};
use switchboard_types::provider::{ProviderDescriptor, Transport};

/// Performs one call against one provider. Never retries, never falls back.
///
/// Uses native async fn in traits (RPITIT). Wrap in
/// [`BoxInvoker`](super::box_invoker::BoxInvoker) for dynamic dispatch.
///
/// Implementations live in switchboard-infra (e.g., `DirectHttpInvoker`).
pub trait ProviderInvoker: Send + Sync {
    /// The transport this invoker serves.
    fn transport(&self) -> Transport;

    /// Call `provider` with `request`.
    ///
    /// A route belonging to a different transport is a
    /// [`DispatchError::Configuration`].
    fn call(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationPayload, DispatchError>> + Send;
}

/// Error for a descriptor handed to the wrong invoker.
pub fn route_mismatch(expected: Transport, provider: &ProviderDescriptor) -> DispatchError {
    DispatchError::configuration(format!(
        "provider '{}' uses {} transport, not {expected}",
        provider.name,
        provider.transport()
    ))
}
