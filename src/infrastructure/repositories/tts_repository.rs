use crate::domain::tts::ProviderError;
use async_trait::async_trait;

/// Voice and model used for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub voice: String,
    pub model: String,
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (DashScope, AWS Polly, OpenAI, ...)
///
/// Implementations synthesize exactly one segment per call. Splitting text,
/// retrying and merging audio are handled by the synthesis service.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Voice and model to use for a language, honoring configured overrides
    fn voice_profile(&self, language: &str) -> VoiceProfile;

    /// Synthesize one segment of text
    ///
    /// Returns encoded audio (MP3)
    ///
    /// # Arguments
    /// * `text` - The segment text, already bounded in length
    /// * `voice` - Provider voice identifier
    /// * `model` - Provider model identifier
    /// * `language_hint` - Language tag of the text (e.g. `zh`, `en`)
    ///
    /// # Errors
    /// Returns the provider failure untouched so it can be classified for retry
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        language_hint: &str,
    ) -> Result<Vec<u8>, ProviderError>;
}
