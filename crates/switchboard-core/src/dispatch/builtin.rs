//! The provider table shipped with Switchboard.
//!
//! Order is preference order. Each capability's designated fallback is an
//! unbounded provider so a quota-exhausted primary always has somewhere to go.

use switchboard_types::capability::Capability;
use switchboard_types::config::CapabilityConfig;
use switchboard_types::provider::{
    DailyLimit, ProviderDescriptor, ProviderRoute, QualityTier, SpeedTier,
};
use switchboard_types::relay::{DEFAULT_CHAT_MODEL, DEFAULT_MULTIMODAL_MODEL};

pub const CHAT_RELAY_PATH: &str = "/api/deepseek";
pub const MULTIMODAL_RELAY_PATH: &str = "/api/gemini";

pub const POLLINATIONS_TEXT_URL: &str = "https://text.pollinations.ai/";
pub const POLLINATIONS_IMAGE_BASE: &str = "https://image.pollinations.ai";
pub const POLLINATIONS_AUDIO_BASE: &str = "https://text.pollinations.ai";
pub const HUGGINGFACE_MODELS_BASE: &str = "https://api-inference.huggingface.co/models";
pub const HUGGINGFACE_TOKEN_ENV: &str = "HUGGINGFACE_TOKEN";

fn descriptor(
    name: &str,
    route: ProviderRoute,
    daily_limit: DailyLimit,
    quality: QualityTier,
    speed: SpeedTier,
) -> ProviderDescriptor {
    ProviderDescriptor {
        name: name.to_string(),
        route,
        daily_limit,
        quality,
        speed,
    }
}

fn hosted_inference(model: &str) -> ProviderRoute {
    ProviderRoute::HostedInference {
        url: format!("{HUGGINGFACE_MODELS_BASE}/{model}"),
        token_env: Some(HUGGINGFACE_TOKEN_ENV.to_string()),
    }
}

fn pollinations_audio() -> ProviderDescriptor {
    descriptor(
        "Pollinations Audio",
        ProviderRoute::AudioTemplate {
            base_url: POLLINATIONS_AUDIO_BASE.to_string(),
            model: "openai-audio".to_string(),
        },
        DailyLimit::Unbounded,
        QualityTier::Good,
        SpeedTier::Fast,
    )
}

/// Every capability with its providers and designated fallback.
pub fn capability_table() -> Vec<CapabilityConfig> {
    vec![
        CapabilityConfig {
            capability: Capability::Script,
            fallback: "Pollinations AI".to_string(),
            providers: vec![
                descriptor(
                    "Pollinations AI",
                    ProviderRoute::HostedText {
                        url: POLLINATIONS_TEXT_URL.to_string(),
                        model: "openai".to_string(),
                    },
                    DailyLimit::Unbounded,
                    QualityTier::High,
                    SpeedTier::Fast,
                ),
                descriptor(
                    "Gemini 2.0 Flash",
                    ProviderRoute::MultimodalRelay {
                        path: MULTIMODAL_RELAY_PATH.to_string(),
                        model: DEFAULT_MULTIMODAL_MODEL.to_string(),
                    },
                    DailyLimit::Unbounded,
                    QualityTier::Premium,
                    SpeedTier::Fast,
                ),
                descriptor(
                    "DeepSeek Chat",
                    ProviderRoute::ChatRelay {
                        path: CHAT_RELAY_PATH.to_string(),
                        model: DEFAULT_CHAT_MODEL.to_string(),
                    },
                    DailyLimit::Unbounded,
                    QualityTier::Premium,
                    SpeedTier::Medium,
                ),
            ],
        },
        CapabilityConfig {
            capability: Capability::Image,
            fallback: "Pollinations FLUX".to_string(),
            providers: vec![
                descriptor(
                    "Pollinations FLUX",
                    ProviderRoute::ImageTemplate {
                        base_url: POLLINATIONS_IMAGE_BASE.to_string(),
                    },
                    DailyLimit::Unbounded,
                    QualityTier::Premium,
                    SpeedTier::Fast,
                ),
                descriptor(
                    "SDXL",
                    hosted_inference("stabilityai/stable-diffusion-xl-base-1.0"),
                    DailyLimit::Bounded(50),
                    QualityTier::High,
                    SpeedTier::Medium,
                ),
            ],
        },
        CapabilityConfig {
            capability: Capability::Voice,
            fallback: "Pollinations Audio".to_string(),
            providers: vec![
                descriptor(
                    "Bark TTS",
                    hosted_inference("suno/bark"),
                    DailyLimit::Bounded(100),
                    QualityTier::High,
                    SpeedTier::Medium,
                ),
                pollinations_audio(),
            ],
        },
        CapabilityConfig {
            capability: Capability::Music,
            fallback: "Pollinations Audio".to_string(),
            providers: vec![
                descriptor(
                    "MusicGen",
                    hosted_inference("facebook/musicgen-small"),
                    DailyLimit::Bounded(30),
                    QualityTier::Good,
                    SpeedTier::Slow,
                ),
                pollinations_audio(),
            ],
        },
    ]
}
