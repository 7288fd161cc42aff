//! Request dispatch with per-provider daily quotas and a single fallback hop.
//!
//! - `ProviderInvoker`: RPITIT trait implemented once per transport
//! - `BoxInvoker` / `InvokerSet`: object-safe wrapper and transport lookup
//! - `ProviderRegistry`: capability -> ordered providers + designated fallback
//! - `UsageTracker`: daily counters with lazy reset
//! - `DispatchOrchestrator`: selection, invocation, fallback

pub mod box_invoker;
pub mod builtin;
pub mod clock;
pub mod invoker;
pub mod orchestrator;
pub mod registry;
pub mod usage;
