use super::tts_repository::{TtsRepository, VoiceProfile};
use crate::domain::tts::{LanguageCode, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
pub const DEFAULT_MODEL: &str = "qwen3-tts-flash";
pub const DEFAULT_VOICE: &str = "Cherry";

const GENERATION_PATH: &str = "/services/aigc/multimodal-generation/generation";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    text: &'a str,
    voice: &'a str,
    language_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    audio: Option<GeneratedAudio>,
}

#[derive(Debug, Deserialize)]
struct GeneratedAudio {
    #[serde(default)]
    url: Option<String>,
}

/// Alibaba DashScope (Qwen TTS) implementation of TTS repository
///
/// The generation endpoint answers with a short-lived URL to the audio,
/// which is downloaded in the same call.
pub struct DashScopeTtsRepository {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl DashScopeTtsRepository {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        voice: String,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            voice,
        })
    }

    /// Replace the per-request timeout (60 seconds by default)
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn generation_url(&self) -> String {
        format!("{}{}", self.base_url, GENERATION_PATH)
    }

    /// DashScope `language_type` for a language tag
    fn language_type(language_hint: &str) -> &'static str {
        LanguageCode::from_tag(language_hint)
            .map(|code| code.english_name())
            .unwrap_or("Auto")
    }

    async fn request_audio_url(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        language_hint: &str,
    ) -> Result<String, ProviderError> {
        let body = GenerationRequest {
            model,
            input: GenerationInput {
                text,
                voice,
                language_type: Self::language_type(language_hint),
            },
        };

        let response = self
            .http
            .post(self.generation_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "dashscope",
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerationResponse = response.json().await?;
        payload
            .output
            .and_then(|output| output.audio)
            .and_then(|audio| audio.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!(
                    "no audio url in response (code: {}, message: {})",
                    payload.code.as_deref().unwrap_or("-"),
                    payload.message.as_deref().unwrap_or("-"),
                ))
            })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                provider: "dashscope",
                status: status.as_u16(),
                body: format!("audio download failed for {}", url),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl TtsRepository for DashScopeTtsRepository {
    fn name(&self) -> &'static str {
        "dashscope"
    }

    fn voice_profile(&self, _language: &str) -> VoiceProfile {
        VoiceProfile {
            voice: self.voice.clone(),
            model: self.model.clone(),
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        language_hint: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let start_time = std::time::Instant::now();
        tracing::debug!(
            model = %model,
            voice = voice,
            language = language_hint,
            text_length = text.chars().count(),
            "Calling DashScope TTS"
        );

        let audio_url = self
            .request_audio_url(text, voice, model, language_hint)
            .await?;
        let audio = self.download(&audio_url).await?;

        tracing::debug!(
            audio_size = audio.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "DashScope audio downloaded"
        );

        Ok(audio)
    }
}
