use super::retry::RetryDecision;

/// Failure raised by a TTS provider for a single request
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{provider} returned status {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error(
        "segment {index} ({language}, {text_length} chars) failed after {attempts} attempt(s), {decision}: {source}"
    )]
    Segment {
        index: usize,
        language: String,
        text_length: usize,
        attempts: u32,
        decision: RetryDecision,
        #[source]
        source: ProviderError,
    },
}

impl SynthesisError {
    /// Position of the segment that aborted the run
    pub fn segment_index(&self) -> usize {
        match self {
            SynthesisError::Segment { index, .. } => *index,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SynthesisError::Segment { attempts, .. } => *attempts,
        }
    }
}
