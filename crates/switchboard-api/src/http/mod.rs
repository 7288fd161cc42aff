//! HTTP layer: relay endpoints plus the `/api/v1` REST routes.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
