//! Generation request/response types.
//!
//! Requests carry a closed, per-capability option struct instead of an open
//! option bag; defaults are applied by `Default` and `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::DispatchError;

/// Provider name attached to failures where no provider was attempted.
pub const NO_PROVIDER: &str = "none";

/// What the caller sees when the orchestrator runs out of options.
pub const APOLOGY_MESSAGE: &str =
    "I'm having trouble reaching my AI services right now. Please try again in a moment.";

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            options,
        }
    }

    pub fn script(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationOptions::Script(ScriptOptions::default()))
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationOptions::Image(ImageOptions::default()))
    }

    pub fn voice(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationOptions::Voice(VoiceOptions::default()))
    }

    pub fn music(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationOptions::Music(MusicOptions::default()))
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn capability(&self) -> Capability {
        self.options.capability()
    }

    /// Prompt with the system prompt folded in, for single-string endpoints.
    pub fn composed_prompt(&self) -> String {
        match &self.system_prompt {
            Some(system) => format!("{system}\n\nUser: {}", self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// Capability-specific options. The tag doubles as the request's capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "lowercase")]
pub enum GenerationOptions {
    Script(ScriptOptions),
    Image(ImageOptions),
    Voice(VoiceOptions),
    Music(MusicOptions),
}

impl GenerationOptions {
    pub fn capability(&self) -> Capability {
        match self {
            GenerationOptions::Script(_) => Capability::Script,
            GenerationOptions::Image(_) => Capability::Image,
            GenerationOptions::Voice(_) => Capability::Voice,
            GenerationOptions::Music(_) => Capability::Music,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
    /// Random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub no_logo: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            seed: None,
            no_logo: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceOptions {
    pub voice: String,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            voice: "alloy".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicOptions {
    pub duration_secs: u32,
}

impl Default for MusicOptions {
    fn default() -> Self {
        Self { duration_secs: 10 }
    }
}

/// Content produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationPayload {
    Text { text: String },
    /// Resolved lazily by whoever fetches the URL.
    ImageUrl { url: String },
    AudioUrl { url: String },
    /// Downloaded content, base64-encoded.
    Binary { content_type: String, data: String },
}

/// Outcome of a dispatch. Always names exactly one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success {
        provider: String,
        payload: GenerationPayload,
    },
    Failure {
        provider: String,
        error: DispatchError,
    },
}

impl GenerationResult {
    pub fn success(provider: impl Into<String>, payload: GenerationPayload) -> Self {
        GenerationResult::Success {
            provider: provider.into(),
            payload,
        }
    }

    pub fn failure(provider: impl Into<String>, error: DispatchError) -> Self {
        GenerationResult::Failure {
            provider: provider.into(),
            error,
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            GenerationResult::Success { provider, .. } | GenerationResult::Failure { provider, .. } => {
                provider
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn payload(&self) -> Option<&GenerationPayload> {
        match self {
            GenerationResult::Success { payload, .. } => Some(payload),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { error, .. } => Some(error),
        }
    }

    /// Text fit for an end user: the content on success, the apology otherwise.
    pub fn user_message(&self) -> String {
        match self {
            GenerationResult::Success { payload, .. } => match payload {
                GenerationPayload::Text { text } => text.clone(),
                GenerationPayload::ImageUrl { url } | GenerationPayload::AudioUrl { url } => {
                    url.clone()
                }
                GenerationPayload::Binary { content_type, .. } => {
                    format!("[{content_type} content]")
                }
            },
            GenerationResult::Failure { .. } => APOLOGY_MESSAGE.to_string(),
        }
    }
}
