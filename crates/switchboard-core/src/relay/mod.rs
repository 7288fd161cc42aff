//! Authenticated relays that attach a server-held secret to upstream calls.
//!
//! Transport-agnostic: handlers pass the raw request body in and get a
//! status plus JSON body out. `UpstreamClient` and `SecretSource` are the
//! ports the infrastructure layer implements.

pub mod chat;
pub mod error;
pub mod multimodal;
pub mod secret;
pub mod upstream;

pub use chat::ChatRelay;
pub use error::RelayError;
pub use multimodal::MultimodalRelay;
pub use secret::SecretSource;
pub use upstream::{UpstreamClient, UpstreamReply};

#[cfg(test)]
mod test_support;
