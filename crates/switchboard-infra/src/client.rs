//! Shared reqwest client construction.

use std::time::Duration;

const USER_AGENT: &str = concat!("switchboard/", env!("CARGO_PKG_VERSION"));

/// Client shared by every invoker and the relay upstream.
///
/// Per-call deadlines are applied by the caller; this only bounds connects.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
}
