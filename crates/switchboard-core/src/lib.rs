//! Business logic for Switchboard.
//!
//! Defines the dispatch "ports" (the invoker trait, the upstream client and
//! secret source traits) that the infrastructure layer implements. Depends
//! only on `switchboard-types` -- never on `switchboard-infra` or any HTTP crate.

pub mod dispatch;
pub mod functions;
pub mod prompt;
pub mod relay;
