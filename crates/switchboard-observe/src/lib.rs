//! Observability for Switchboard: subscriber setup and span attribute names.

pub mod dispatch_attrs;
pub mod tracing_setup;
