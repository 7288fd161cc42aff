//! Span field names recorded by dispatch and the HTTP layer.
//!
//! Usable with `Span::record`; the `tracing::info_span!` macros need the
//! same names as literals.

// --- Dispatch span fields ---

/// Capability of the request ("script", "image", ...).
pub const DISPATCH_CAPABILITY: &str = "dispatch.capability";

/// Provider that produced the result.
pub const DISPATCH_PROVIDER: &str = "dispatch.provider";

/// Whether the designated fallback was tried.
pub const DISPATCH_FALLBACK: &str = "dispatch.fallback";

/// "success" or "failure".
pub const DISPATCH_OUTCOME: &str = "dispatch.outcome";

// --- HTTP span fields ---

pub const HTTP_METHOD: &str = "http.method";
pub const HTTP_ROUTE: &str = "http.route";
pub const HTTP_STATUS: &str = "http.status_code";
pub const REQUEST_ID: &str = "request.id";

// --- Outcome values ---

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";
