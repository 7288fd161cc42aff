//! UrlTemplateInvoker -- generation by URL construction.
//!
//! No I/O happens here. The returned URL is resolved by whoever fetches it,
//! so the only failure is a base URL that cannot carry a path.

use reqwest::Url;

use switchboard_core::dispatch::invoker::{ProviderInvoker, route_mismatch};
use switchboard_types::error::DispatchError;
use switchboard_types::generation::{
    GenerationOptions, GenerationPayload, GenerationRequest, ImageOptions, VoiceOptions,
};
use switchboard_types::provider::{ProviderDescriptor, ProviderRoute, Transport};

const IMAGE_STYLE_SUFFIX: &str =
    ", cinematic lighting, professional photography, 8k, ultra detailed, award-winning";

#[derive(Debug, Default)]
pub struct UrlTemplateInvoker;

impl UrlTemplateInvoker {
    pub fn new() -> Self {
        Self
    }
}

fn parse_base(base_url: &str) -> Result<Url, DispatchError> {
    let url = Url::parse(base_url)
        .map_err(|e| DispatchError::configuration(format!("invalid base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(DispatchError::configuration(format!(
            "base URL '{base_url}' cannot carry a path"
        )));
    }
    Ok(url)
}

fn push_segments(url: &mut Url, segments: &[&str]) -> Result<(), DispatchError> {
    let mut path = url
        .path_segments_mut()
        .map_err(|()| DispatchError::configuration("base URL cannot carry a path"))?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    Ok(())
}

pub fn image_url(base_url: &str, prompt: &str, opts: &ImageOptions) -> Result<String, DispatchError> {
    let mut url = parse_base(base_url)?;
    let styled = format!("{prompt}{IMAGE_STYLE_SUFFIX}");
    push_segments(&mut url, &["prompt", &styled])?;

    let seed = opts.seed.unwrap_or_else(|| u64::from(rand::random::<u32>()));
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("width", &opts.width.to_string())
            .append_pair("height", &opts.height.to_string())
            .append_pair("seed", &seed.to_string());
        if opts.no_logo {
            query.append_pair("nologo", "true");
        }
    }
    Ok(url.into())
}

pub fn audio_url(base_url: &str, model: &str, prompt: &str, voice: &str) -> Result<String, DispatchError> {
    let mut url = parse_base(base_url)?;
    push_segments(&mut url, &[prompt])?;
    url.query_pairs_mut()
        .append_pair("model", model)
        .append_pair("voice", voice);
    Ok(url.into())
}

impl ProviderInvoker for UrlTemplateInvoker {
    fn transport(&self) -> Transport {
        Transport::UrlTemplated
    }

    async fn call(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationPayload, DispatchError> {
        match &provider.route {
            ProviderRoute::ImageTemplate { base_url } => {
                let opts = match &request.options {
                    GenerationOptions::Image(opts) => opts.clone(),
                    _ => ImageOptions::default(),
                };
                let url = image_url(base_url, &request.prompt, &opts)?;
                Ok(GenerationPayload::ImageUrl { url })
            }
            ProviderRoute::AudioTemplate { base_url, model } => {
                let voice = match &request.options {
                    GenerationOptions::Voice(opts) => opts.voice.clone(),
                    _ => VoiceOptions::default().voice,
                };
                let url = audio_url(base_url, model, &request.prompt, &voice)?;
                Ok(GenerationPayload::AudioUrl { url })
            }
            _ => Err(route_mismatch(Transport::UrlTemplated, provider)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(route: ProviderRoute) -> ProviderDescriptor {
        ProviderDescriptor {
            name: "Pollinations".into(),
            route,
            daily_limit: Default::default(),
            quality: Default::default(),
            speed: Default::default(),
        }
    }

    #[test]
    fn test_image_url_encodes_prompt_and_query() {
        let opts = ImageOptions {
            width: 1024,
            height: 576,
            seed: Some(7),
            no_logo: true,
        };
        let url = image_url("https://image.pollinations.ai", "a red fox", &opts).unwrap();
        assert!(url.starts_with("https://image.pollinations.ai/prompt/a%20red%20fox,%20cinematic%20lighting"));
        assert!(url.ends_with("?width=1024&height=576&seed=7&nologo=true"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_image_url_random_seed_and_logo() {
        let opts = ImageOptions {
            no_logo: false,
            ..ImageOptions::default()
        };
        let url = Url::parse(&image_url("https://image.example/", "fox", &opts).unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("width".into(), "1920".into()));
        assert_eq!(pairs[1], ("height".into(), "1080".into()));
        assert_eq!(pairs[2].0, "seed");
        assert!(pairs[2].1.parse::<u64>().is_ok());
        assert_eq!(pairs.len(), 3);
        assert_eq!(url.path_segments().unwrap().next(), Some("prompt"));
    }

    #[test]
    fn test_prompt_slashes_stay_in_one_segment() {
        let url = audio_url("https://text.pollinations.ai", "openai-audio", "yes/no?", "alloy").unwrap();
        assert_eq!(
            url,
            "https://text.pollinations.ai/yes%2Fno%3F?model=openai-audio&voice=alloy"
        );
    }

    #[tokio::test]
    async fn test_call_builds_audio_url_with_voice() {
        let route = ProviderRoute::AudioTemplate {
            base_url: "https://text.pollinations.ai".into(),
            model: "openai-audio".into(),
        };
        let mut request = GenerationRequest::voice("hello there");
        request.options = GenerationOptions::Voice(VoiceOptions { voice: "nova".into() });

        let payload = UrlTemplateInvoker::new()
            .call(&descriptor(route.clone()), &request)
            .await
            .unwrap();
        assert_eq!(
            payload,
            GenerationPayload::AudioUrl {
                url: "https://text.pollinations.ai/hello%20there?model=openai-audio&voice=nova".into()
            }
        );

        // Music requests reuse the default voice.
        let payload = UrlTemplateInvoker::new()
            .call(&descriptor(route), &GenerationRequest::music("lofi beat"))
            .await
            .unwrap();
        assert!(matches!(payload, GenerationPayload::AudioUrl { url } if url.ends_with("voice=alloy")));
    }

    #[tokio::test]
    async fn test_malformed_base_is_configuration_error() {
        let route = ProviderRoute::ImageTemplate {
            base_url: "not a url".into(),
        };
        let err = UrlTemplateInvoker::new()
            .call(&descriptor(route), &GenerationRequest::image("fox"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Configuration { .. }));
        assert!(!err.is_fallback_eligible());

        let route = ProviderRoute::AudioTemplate {
            base_url: "mailto:someone@example.com".into(),
            model: "openai-audio".into(),
        };
        let err = UrlTemplateInvoker::new()
            .call(&descriptor(route), &GenerationRequest::voice("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Configuration { .. }));
    }
}
