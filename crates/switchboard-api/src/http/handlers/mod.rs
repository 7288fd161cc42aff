//! HTTP request handlers.

pub mod generate;
pub mod providers;
pub mod relay;
