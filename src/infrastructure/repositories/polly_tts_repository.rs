use super::tts_repository::{TtsRepository, VoiceProfile};
use crate::domain::tts::{LanguageCode, ProviderError};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Select the appropriate Polly voice for a language (all neural capable)
    fn get_voice_for_language(language: Option<LanguageCode>) -> &'static str {
        match language {
            Some(LanguageCode::Chinese) => "Zhiyu",
            Some(LanguageCode::English) | None => "Joanna",
            Some(LanguageCode::Spanish) => "Lupe",
            Some(LanguageCode::French) => "Lea",
            Some(LanguageCode::German) => "Vicki",
            Some(LanguageCode::Italian) => "Bianca",
            Some(LanguageCode::Portuguese) => "Ines",
            Some(LanguageCode::Japanese) => "Kazuha",
            Some(LanguageCode::Korean) => "Seoyeon",
        }
    }

    fn parse_engine(model: &str) -> Engine {
        match model.to_lowercase().as_str() {
            "standard" => Engine::Standard,
            _ => Engine::Neural,
        }
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn name(&self) -> &'static str {
        "polly"
    }

    fn voice_profile(&self, language: &str) -> VoiceProfile {
        VoiceProfile {
            voice: Self::get_voice_for_language(LanguageCode::from_tag(language)).to_string(),
            model: "neural".to_string(),
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        language_hint: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let voice_id = VoiceId::from(voice);
        let engine = Self::parse_engine(model);

        tracing::debug!(
            language = language_hint,
            voice_id = ?voice_id,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.chars().count(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    language = language_hint,
                    voice = voice,
                    engine = ?engine,
                    "AWS Polly synthesize_speech failed"
                );
                ProviderError::Other(anyhow::Error::new(e).context("AWS Polly request failed"))
            })?;

        // Get audio stream
        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to collect audio stream from Polly response");
            ProviderError::Other(anyhow::Error::new(e).context("failed to read Polly audio stream"))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}
