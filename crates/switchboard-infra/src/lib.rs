//! Infrastructure layer for Switchboard.
//!
//! Implements the ports defined in `switchboard-core`: one reqwest-backed
//! invoker per transport, the upstream client used by the relays, and the
//! environment secret source. Also loads `switchboard.toml`.

pub mod client;
pub mod config;
pub mod invoker;
pub mod relay;
pub mod secret;
