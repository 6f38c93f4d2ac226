use crate::domain::lesson::LessonAudioError;
use crate::domain::tts::ProviderError;
use crate::infrastructure::config::ConfigError;
use std::path::PathBuf;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Lesson(#[from] LessonAudioError),
}

impl AppError {
    /// Process exit code for this error
    ///
    /// 2 for usage and configuration problems, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::EnvFile { .. } | Self::BadRequest(_) => 2,
            Self::Lesson(LessonAudioError::NoLanguages) => 2,
            Self::Provider(_) | Self::Lesson(_) => 1,
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
