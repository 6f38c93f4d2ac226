pub mod dashscope_tts_repository;
pub mod lesson_repository;
pub mod mock_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use dashscope_tts_repository::DashScopeTtsRepository;
pub use lesson_repository::{JsonLessonRepository, LessonRepository};
pub use mock_tts_repository::MockTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::{TtsRepository, VoiceProfile};

use crate::domain::tts::ProviderError;
use crate::infrastructure::config::ProviderSettings;
use std::sync::Arc;

/// Instantiate the TTS repository selected by configuration
pub async fn build_tts_repository(
    settings: &ProviderSettings,
) -> Result<Arc<dyn TtsRepository>, ProviderError> {
    let repository: Arc<dyn TtsRepository> = match settings {
        ProviderSettings::DashScope {
            api_key,
            base_url,
            model,
            voice,
        } => Arc::new(DashScopeTtsRepository::new(
            api_key.clone(),
            base_url.clone(),
            model.clone(),
            voice.clone(),
        )?),
        ProviderSettings::OpenAi {
            api_key,
            model,
            voice,
        } => Arc::new(OpenAiTtsRepository::from_api_key(
            api_key,
            model.clone(),
            voice.clone(),
        )),
        ProviderSettings::Polly { region } => {
            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (profile, instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await;
            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            Arc::new(PollyTtsRepository::new(Arc::new(
                aws_sdk_polly::Client::new(&aws_config),
            )))
        }
        ProviderSettings::Mock => Arc::new(MockTtsRepository::new()),
    };

    tracing::info!(provider = repository.name(), "TTS repository initialized");
    Ok(repository)
}
