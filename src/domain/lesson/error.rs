use crate::domain::tts::SynthesisError;
use crate::infrastructure::audio::ConcatError;
use std::path::PathBuf;

/// Failure reading the lesson record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lesson data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure producing the audio for one language
#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Concat(#[from] ConcatError),
}

/// Failure that stops the whole run before any language is processed
#[derive(Debug, thiserror::Error)]
pub enum LessonAudioError {
    #[error("lesson store error: {0}")]
    Store(#[from] StoreError),
    #[error("no languages requested")]
    NoLanguages,
}
