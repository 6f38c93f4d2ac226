use async_trait::async_trait;
use daily_lesson_tts::domain::tts::ProviderError;
use daily_lesson_tts::infrastructure::repositories::{TtsRepository, VoiceProfile};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

pub fn mock_audio_bytes(text: &str) -> Vec<u8> {
    let mut audio = vec![0xFF, 0xFB, 0x90, 0x00];
    audio.extend_from_slice(text.as_bytes());
    audio
}

/// Failure injected into a scripted call
#[derive(Debug, Clone)]
pub enum Failure {
    ConnectionReset,
    InvalidApiKey,
}

impl Failure {
    fn into_error(self) -> ProviderError {
        match self {
            Failure::ConnectionReset => ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "Connection reset by peer",
            )),
            Failure::InvalidApiKey => ProviderError::Api {
                provider: "scripted",
                status: 401,
                body: "invalid API key".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub language: String,
    pub text: String,
}

/// In-memory TTS repository whose failures are scripted per text or language
#[derive(Default)]
pub struct ScriptedTtsRepository {
    by_text: Mutex<HashMap<String, VecDeque<Failure>>>,
    failing_languages: Mutex<HashMap<String, Failure>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTtsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `times` calls for exactly this text
    pub fn fail_text(self, text: &str, failure: Failure, times: usize) -> Self {
        self.by_text
            .lock()
            .entry(text.to_string())
            .or_default()
            .extend(std::iter::repeat(failure).take(times));
        self
    }

    /// Fail every call for this language
    pub fn fail_language(self, language: &str, failure: Failure) -> Self {
        self.failing_languages
            .lock()
            .insert(language.to_string(), failure);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl TtsRepository for ScriptedTtsRepository {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn voice_profile(&self, language: &str) -> VoiceProfile {
        VoiceProfile {
            voice: format!("voice-{}", language),
            model: "scripted".to_string(),
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        _voice: &str,
        _model: &str,
        language_hint: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        self.calls.lock().push(RecordedCall {
            language: language_hint.to_string(),
            text: text.to_string(),
        });

        if let Some(failure) = self.failing_languages.lock().get(language_hint).cloned() {
            return Err(failure.into_error());
        }
        if let Some(failure) = self
            .by_text
            .lock()
            .get_mut(text)
            .and_then(VecDeque::pop_front)
        {
            return Err(failure.into_error());
        }

        Ok(mock_audio_bytes(text))
    }
}
