//! Configuration types for Switchboard.
//!
//! `SwitchboardConfig` represents `switchboard.toml`: server bind address,
//! relay and upstream URLs, per-transport deadlines, and an optional
//! override of the built-in capability table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::provider::{ProviderDescriptor, Transport};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Per-capability overrides. Each entry replaces the built-in entry for
    /// its capability; capabilities not listed keep their built-in providers.
    #[serde(default)]
    pub capabilities: Vec<CapabilityConfig>,
}

impl SwitchboardConfig {
    /// Base URL the proxied invoker sends relay requests to.
    ///
    /// Defaults to this process's own server.
    pub fn relay_base_url(&self) -> String {
        self.relay
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Relay endpoints and the upstream APIs they forward to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Where relay paths are served; `None` means this process.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_deepseek_base_url")]
    pub deepseek_base_url: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Environment variable holding the chat relay secret.
    #[serde(default = "default_deepseek_key_env")]
    pub deepseek_key_env: String,

    /// Environment variable holding the multimodal relay secret.
    #[serde(default = "default_gemini_key_env")]
    pub gemini_key_env: String,
}

fn default_deepseek_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_deepseek_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            deepseek_base_url: default_deepseek_base_url(),
            gemini_base_url: default_gemini_base_url(),
            deepseek_key_env: default_deepseek_key_env(),
            gemini_key_env: default_gemini_key_env(),
        }
    }
}

/// Per-transport invocation deadlines, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_direct_secs")]
    pub direct_secs: u64,
    #[serde(default = "default_proxied_secs")]
    pub proxied_secs: u64,
    #[serde(default = "default_url_templated_secs")]
    pub url_templated_secs: u64,
}

fn default_direct_secs() -> u64 {
    60
}

fn default_proxied_secs() -> u64 {
    120
}

fn default_url_templated_secs() -> u64 {
    5
}

impl TimeoutConfig {
    pub fn for_transport(&self, transport: Transport) -> Duration {
        let secs = match transport {
            Transport::ClientDirectHttp => self.direct_secs,
            Transport::ServerProxiedHttp => self.proxied_secs,
            Transport::UrlTemplated => self.url_templated_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            direct_secs: default_direct_secs(),
            proxied_secs: default_proxied_secs(),
            url_templated_secs: default_url_templated_secs(),
        }
    }
}

/// Provider list for one capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    pub capability: Capability,
    /// Name of the provider tried once after a primary failure.
    pub fallback: String,
    pub providers: Vec<ProviderDescriptor>,
}
