//! Shared domain types for Switchboard.
//!
//! This crate contains the types used across the dispatch layer: capabilities,
//! provider descriptors, generation requests/results, relay wire bodies,
//! configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod capability;
pub mod config;
pub mod error;
pub mod generation;
pub mod provider;
pub mod relay;
pub mod usage;
