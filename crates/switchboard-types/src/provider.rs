//! Provider descriptors: the immutable rows of the capability table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invocation strategy for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Public hosted endpoint reachable without a server-held secret.
    ClientDirectHttp,
    /// Local relay that attaches the provider secret server-side.
    ServerProxiedHttp,
    /// Generation is URL construction; content is resolved when the URL is fetched.
    UrlTemplated,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::ClientDirectHttp => write!(f, "client_direct_http"),
            Transport::ServerProxiedHttp => write!(f, "server_proxied_http"),
            Transport::UrlTemplated => write!(f, "url_templated"),
        }
    }
}

/// Concrete endpoint a provider is reached through.
///
/// Each route belongs to exactly one [`Transport`], so a descriptor's
/// transport tag can never disagree with how it is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderRoute {
    /// OpenAI-style public text endpoint (e.g. Pollinations text).
    HostedText { url: String, model: String },
    /// Hosted inference endpoint returning binary content (e.g. HuggingFace).
    ///
    /// `token_env` names an optional environment variable holding a bearer token.
    HostedInference {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_env: Option<String>,
    },
    /// Local relay speaking the chat-completions schema.
    ChatRelay { path: String, model: String },
    /// Local relay speaking the prompt/multimodal schema.
    MultimodalRelay { path: String, model: String },
    /// Image URL template: `{base_url}/prompt/{prompt}?width=..`.
    ImageTemplate { base_url: String },
    /// Audio URL template: `{base_url}/{prompt}?model=..&voice=..`.
    AudioTemplate { base_url: String, model: String },
}

impl ProviderRoute {
    pub fn transport(&self) -> Transport {
        match self {
            ProviderRoute::HostedText { .. } | ProviderRoute::HostedInference { .. } => {
                Transport::ClientDirectHttp
            }
            ProviderRoute::ChatRelay { .. } | ProviderRoute::MultimodalRelay { .. } => {
                Transport::ServerProxiedHttp
            }
            ProviderRoute::ImageTemplate { .. } | ProviderRoute::AudioTemplate { .. } => {
                Transport::UrlTemplated
            }
        }
    }
}

/// Daily call budget for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<u32>", into = "Option<u32>")]
pub enum DailyLimit {
    Bounded(u32),
    #[default]
    Unbounded,
}

impl DailyLimit {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, DailyLimit::Unbounded)
    }

    /// Whether `used` calls leave room for one more.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            DailyLimit::Bounded(limit) => used < *limit,
            DailyLimit::Unbounded => true,
        }
    }
}

impl TryFrom<Option<u32>> for DailyLimit {
    type Error = String;

    fn try_from(value: Option<u32>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(DailyLimit::Unbounded),
            Some(0) => Err("daily_limit must be a positive integer".to_string()),
            Some(n) => Ok(DailyLimit::Bounded(n)),
        }
    }
}

impl From<DailyLimit> for Option<u32> {
    fn from(value: DailyLimit) -> Self {
        match value {
            DailyLimit::Bounded(n) => Some(n),
            DailyLimit::Unbounded => None,
        }
    }
}

impl fmt::Display for DailyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DailyLimit::Bounded(n) => write!(f, "{n}"),
            DailyLimit::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Informational quality tier. Never used in selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Premium,
    #[default]
    High,
    Good,
}

/// Informational speed tier. Never used in selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    #[default]
    Fast,
    Medium,
    Slow,
}

/// One concrete upstream API mapped to a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Display identifier, unique within a capability's list.
    pub name: String,
    pub route: ProviderRoute,
    /// Absent in config means unbounded.
    #[serde(default)]
    pub daily_limit: DailyLimit,
    #[serde(default)]
    pub quality: QualityTier,
    #[serde(default)]
    pub speed: SpeedTier,
}

impl ProviderDescriptor {
    pub fn transport(&self) -> Transport {
        self.route.transport()
    }
}
