use super::tts_repository::{TtsRepository, VoiceProfile};
use crate::domain::tts::{LanguageCode, ProviderError};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, default_voice: String) -> Self {
        Self {
            client,
            model,
            default_voice,
        }
    }

    pub fn from_api_key(api_key: &str, model: String, default_voice: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self::new(Arc::new(Client::with_config(config)), model, default_voice)
    }

    /// Select the appropriate OpenAI voice for a language
    /// Based on voice characteristics that suit each language
    fn get_voice_for_language(language: Option<LanguageCode>) -> &'static str {
        match language {
            Some(LanguageCode::Chinese) => "nova",
            Some(LanguageCode::English) => "alloy",
            Some(LanguageCode::Spanish) => "echo",
            Some(LanguageCode::French) => "nova",
            Some(LanguageCode::German) => "onyx",
            Some(LanguageCode::Italian) => "fable",
            Some(LanguageCode::Portuguese) => "shimmer",
            Some(LanguageCode::Japanese) | Some(LanguageCode::Korean) | None => "alloy",
        }
    }

    fn parse_model(model: &str) -> SpeechModel {
        match model {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn parse_voice(voice: &str) -> Voice {
        match voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy,
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn voice_profile(&self, language: &str) -> VoiceProfile {
        let voice = if self.default_voice.is_empty() {
            Self::get_voice_for_language(LanguageCode::from_tag(language)).to_string()
        } else {
            self.default_voice.clone()
        };
        VoiceProfile {
            voice,
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
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: Self::parse_model(model),
            input: text.to_string(),
            voice: Self::parse_voice(voice),
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::warn!(
                error = %e,
                model = %model,
                voice = voice,
                "OpenAI TTS API call failed"
            );
            ProviderError::Other(anyhow::Error::new(e).context("OpenAI TTS request failed"))
        })?;

        let audio_bytes = response.bytes.to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "OpenAI TTS audio received successfully"
        );

        Ok(audio_bytes)
    }
}
