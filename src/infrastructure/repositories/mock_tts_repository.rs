use super::tts_repository::{TtsRepository, VoiceProfile};
use crate::domain::tts::ProviderError;
use async_trait::async_trait;

/// MPEG-1 Layer III frame header
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

/// Offline TTS repository producing placeholder audio
///
/// Every call returns a frame header followed by the segment text, so the
/// assembled file is deterministic and shows which text went where.
#[derive(Debug, Default, Clone)]
pub struct MockTtsRepository;

impl MockTtsRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn audio_for(text: &str) -> Vec<u8> {
        let mut audio = MP3_FRAME_HEADER.to_vec();
        audio.extend_from_slice(text.as_bytes());
        audio
    }
}

#[async_trait]
impl TtsRepository for MockTtsRepository {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn voice_profile(&self, language: &str) -> VoiceProfile {
        VoiceProfile {
            voice: format!("mock-{}", language),
            model: "mock".to_string(),
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        _voice: &str,
        _model: &str,
        language_hint: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(
            language = language_hint,
            text_length = text.chars().count(),
            "Mock TTS call"
        );
        Ok(Self::audio_for(text))
    }
}
