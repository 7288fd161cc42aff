//! One-shot dispatch commands: generate, chat, script.

use anyhow::{Result, bail};
use console::style;

use switchboard_core::prompt::CampaignBrief;
use switchboard_types::capability::Capability;
use switchboard_types::generation::{
    GenerationOptions, GenerationPayload, GenerationRequest, GenerationResult, ImageOptions,
    MusicOptions, ScriptOptions, VoiceOptions,
};

use crate::cli::{GenerateArgs, ScriptArgs};
use crate::state::AppState;

pub async fn generate(state: &AppState, args: GenerateArgs, json: bool) -> Result<()> {
    let request = build_request(args);
    let result = state.orchestrator.invoke(&request).await;
    print_result(&result, json)
}

pub async fn chat(state: &AppState, message: &str, system: Option<&str>, json: bool) -> Result<()> {
    let result = state.orchestrator.chat(message, system).await;
    print_result(&result, json)
}

pub async fn script(state: &AppState, args: ScriptArgs, json: bool) -> Result<()> {
    let brief = CampaignBrief {
        product_name: args.product,
        audience: args.audience,
        mood: args.mood,
        platform: args.platform,
        emotional_core: args.emotional_core,
        human_truth: args.human_truth,
        pain_point: args.pain_point,
        real_purchaser: args.real_purchaser,
    };
    let result = state.orchestrator.generate_script(&brief).await;
    print_result(&result, json)
}

/// Request for the chosen capability, unset flags taking option defaults.
pub fn build_request(args: GenerateArgs) -> GenerationRequest {
    let options = match args.capability {
        Capability::Script => {
            let defaults = ScriptOptions::default();
            GenerationOptions::Script(ScriptOptions {
                temperature: args.temperature.unwrap_or(defaults.temperature),
                max_tokens: args.max_tokens.unwrap_or(defaults.max_tokens),
            })
        }
        Capability::Image => {
            let defaults = ImageOptions::default();
            GenerationOptions::Image(ImageOptions {
                width: args.width.unwrap_or(defaults.width),
                height: args.height.unwrap_or(defaults.height),
                seed: args.seed,
                ..defaults
            })
        }
        Capability::Voice => GenerationOptions::Voice(VoiceOptions {
            voice: args.voice.unwrap_or_else(|| VoiceOptions::default().voice),
        }),
        Capability::Music => GenerationOptions::Music(MusicOptions {
            duration_secs: args
                .duration
                .unwrap_or(MusicOptions::default().duration_secs),
        }),
    };

    let request = GenerationRequest::new(args.prompt, options);
    match args.system {
        Some(system) => request.with_system_prompt(system),
        None => request,
    }
}

fn print_result(result: &GenerationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    }

    match result {
        GenerationResult::Success { provider, payload } => {
            if !json {
                println!();
                println!(
                    "  {} via {}",
                    style("✓").green().bold(),
                    style(provider).cyan()
                );
                println!();
                match payload {
                    GenerationPayload::Text { text } => println!("{text}"),
                    GenerationPayload::ImageUrl { url } | GenerationPayload::AudioUrl { url } => {
                        println!("  {}", style(url).underlined())
                    }
                    GenerationPayload::Binary { content_type, data } => println!(
                        "  {} ({} base64 chars)",
                        style(content_type).bold(),
                        data.len()
                    ),
                }
                println!();
            }
            Ok(())
        }
        GenerationResult::Failure { provider, error } => {
            if !json {
                println!();
                println!("  {} {}", style("✗").red().bold(), result.user_message());
                println!();
            }
            bail!("{provider}: {error}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(capability: Capability) -> GenerateArgs {
        GenerateArgs {
            capability,
            prompt: "a quiet harbour".into(),
            system: None,
            width: None,
            height: None,
            seed: None,
            temperature: None,
            max_tokens: None,
            voice: None,
            duration: None,
        }
    }

    #[test]
    fn test_build_image_request_merges_flags_with_defaults() {
        let mut a = args(Capability::Image);
        a.width = Some(1024);
        a.seed = Some(9);
        let request = build_request(a);
        assert_eq!(
            request.options,
            GenerationOptions::Image(ImageOptions {
                width: 1024,
                height: 1080,
                seed: Some(9),
                no_logo: true,
            })
        );
    }

    #[test]
    fn test_build_script_request_with_system_prompt() {
        let mut a = args(Capability::Script);
        a.system = Some("Be brief.".into());
        a.max_tokens = Some(256);
        let request = build_request(a);
        assert_eq!(request.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(
            request.options,
            GenerationOptions::Script(ScriptOptions {
                temperature: 0.7,
                max_tokens: 256,
            })
        );
    }

    #[test]
    fn test_build_voice_and_music_defaults() {
        assert_eq!(
            build_request(args(Capability::Voice)).options,
            GenerationOptions::Voice(VoiceOptions::default())
        );
        let mut a = args(Capability::Music);
        a.duration = Some(30);
        assert_eq!(
            build_request(a).options,
            GenerationOptions::Music(MusicOptions { duration_secs: 30 })
        );
    }
}
