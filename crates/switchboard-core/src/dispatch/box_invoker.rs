//! BoxInvoker -- object-safe dynamic dispatch wrapper for ProviderInvoker.
//!
//! 1. `ProviderInvokerDyn` is object-safe with boxed futures
//! 2. Blanket impl for all `T: ProviderInvoker`
//! 3. `BoxInvoker` wraps `Box<dyn ProviderInvokerDyn>` and delegates
//!
//! `InvokerSet` maps each transport to its invoker.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use switchboard_types::error::DispatchError;
use switchboard_types::generation::{GenerationPayload, GenerationRequest};
use switchboard_types::provider::{ProviderDescriptor, Transport};

use super::invoker::ProviderInvoker;

type InvokeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerationPayload, DispatchError>> + Send + 'a>>;

/// Object-safe version of [`ProviderInvoker`].
pub trait ProviderInvokerDyn: Send + Sync {
    fn transport(&self) -> Transport;

    fn call_boxed<'a>(
        &'a self,
        provider: &'a ProviderDescriptor,
        request: &'a GenerationRequest,
    ) -> InvokeFuture<'a>;
}

impl<T: ProviderInvoker> ProviderInvokerDyn for T {
    fn transport(&self) -> Transport {
        ProviderInvoker::transport(self)
    }

    fn call_boxed<'a>(
        &'a self,
        provider: &'a ProviderDescriptor,
        request: &'a GenerationRequest,
    ) -> InvokeFuture<'a> {
        Box::pin(self.call(provider, request))
    }
}

/// Type-erased invoker.
pub struct BoxInvoker {
    inner: Box<dyn ProviderInvokerDyn + Send + Sync>,
}

impl BoxInvoker {
    pub fn new<T: ProviderInvoker + 'static>(invoker: T) -> Self {
        Self {
            inner: Box::new(invoker),
        }
    }

    pub fn transport(&self) -> Transport {
        self.inner.transport()
    }

    pub async fn call(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        self.inner.call_boxed(provider, request).await
    }
}

/// Invokers keyed by the transport they serve.
#[derive(Default)]
pub struct InvokerSet {
    invokers: HashMap<Transport, BoxInvoker>,
}

impl InvokerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an invoker, replacing any previous one for the same transport.
    pub fn with<T: ProviderInvoker + 'static>(mut self, invoker: T) -> Self {
        self.insert(BoxInvoker::new(invoker));
        self
    }

    pub fn insert(&mut self, invoker: BoxInvoker) {
        self.invokers.insert(invoker.transport(), invoker);
    }

    pub fn get(&self, transport: Transport) -> Option<&BoxInvoker> {
        self.invokers.get(&transport)
    }

    pub fn transports(&self) -> Vec<Transport> {
        let mut transports: Vec<Transport> = self.invokers.keys().copied().collect();
        transports.sort_by_key(|t| t.to_string());
        transports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::provider::ProviderRoute;

    struct EchoInvoker;

    impl ProviderInvoker for EchoInvoker {
        fn transport(&self) -> Transport {
            Transport::UrlTemplated
        }

        async fn call(
            &self,
            provider: &ProviderDescriptor,
            request: &GenerationRequest,
        ) -> Result<GenerationPayload, DispatchError> {
            Ok(GenerationPayload::ImageUrl {
                url: format!("{}:{}", provider.name, request.prompt),
            })
        }
    }

    #[tokio::test]
    async fn test_invoker_set_dispatches_by_transport() {
        let set = InvokerSet::new().with(EchoInvoker);
        assert!(set.get(Transport::ClientDirectHttp).is_none());

        let invoker = set.get(Transport::UrlTemplated).unwrap();
        let provider = ProviderDescriptor {
            name: "Echo".into(),
            route: ProviderRoute::ImageTemplate {
                base_url: "https://image.example".into(),
            },
            daily_limit: Default::default(),
            quality: Default::default(),
            speed: Default::default(),
        };
        let payload = invoker
            .call(&provider, &GenerationRequest::image("fox"))
            .await
            .unwrap();
        assert_eq!(
            payload,
            GenerationPayload::ImageUrl {
                url: "Echo:fox".into()
            }
        );
        assert_eq!(set.transports(), vec![Transport::UrlTemplated]);
    }
}
