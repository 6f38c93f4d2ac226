use super::error::{ProviderError, SynthesisError};
use super::retry::{classify, RetryDecision, RetryPolicy};
use super::segment::{AudioFragment, Segment};
use super::text::slugify;
use crate::infrastructure::repositories::{TtsRepository, VoiceProfile};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of one segment while it is being synthesized
#[derive(Debug)]
pub enum SegmentState {
    Pending,
    InFlight {
        attempt: u32,
    },
    RetryScheduled {
        attempt: u32,
        delay: Duration,
    },
    Succeeded {
        attempts: u32,
        audio: Vec<u8>,
    },
    Failed {
        attempts: u32,
        decision: RetryDecision,
        error: ProviderError,
    },
}

pub struct SynthesisService {
    tts_repo: Arc<dyn TtsRepository>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl SynthesisService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, policy: RetryPolicy) -> Self {
        Self {
            tts_repo,
            policy,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` segments in flight; results keep source order
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.tts_repo.name()
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Synthesize every segment for one language
    ///
    /// Fragments come back in the order of `segments`. The first segment that
    /// fails (fatal error, or retries exhausted) aborts the whole call and no
    /// fragment is returned.
    async fn synthesize_segments(
        &self,
        segments: &[Segment],
        language: &str,
    ) -> Result<Vec<AudioFragment>, SynthesisError>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    async fn synthesize_segments(
        &self,
        segments: &[Segment],
        language: &str,
    ) -> Result<Vec<AudioFragment>, SynthesisError> {
        let start_time = std::time::Instant::now();
        let profile = self.tts_repo.voice_profile(language);

        tracing::info!(
            provider = self.tts_repo.name(),
            language = %language,
            voice = %profile.voice,
            model = %profile.model,
            segment_count = segments.len(),
            concurrency = self.concurrency,
            "Starting segment synthesis"
        );

        let pending: Vec<_> = segments
            .iter()
            .map(|segment| self.synthesize_segment(segment, &profile, language))
            .collect();
        let fragments: Vec<AudioFragment> = stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let audio_size: usize = fragments.iter().map(|f| f.audio.len()).sum();
        tracing::info!(
            provider = self.tts_repo.name(),
            language = %language,
            segment_count = fragments.len(),
            audio_size_bytes = audio_size,
            latency_ms = start_time.elapsed().as_millis(),
            "Segment synthesis completed"
        );

        Ok(fragments)
    }
}

impl SynthesisService {
    /// Drive one segment through its state machine until it succeeds or fails
    async fn synthesize_segment(
        &self,
        segment: &Segment,
        profile: &VoiceProfile,
        language: &str,
    ) -> Result<AudioFragment, SynthesisError> {
        let mut state = SegmentState::Pending;
        loop {
            state = match self.advance(state, segment, profile, language).await {
                SegmentState::Succeeded { attempts, audio } => {
                    tracing::debug!(
                        segment_index = segment.index,
                        attempts = attempts,
                        audio_size = audio.len(),
                        "Segment synthesized"
                    );
                    return Ok(AudioFragment {
                        index: segment.index,
                        label: slugify(&segment.text, segment.kind.as_str()),
                        audio,
                    });
                }
                SegmentState::Failed {
                    attempts,
                    decision,
                    error,
                } => {
                    tracing::error!(
                        segment_index = segment.index,
                        segment_kind = %segment.kind,
                        language = %language,
                        text_length = segment.char_count(),
                        attempts = attempts,
                        decision = %decision,
                        error = %error,
                        "Segment synthesis failed"
                    );
                    return Err(SynthesisError::Segment {
                        index: segment.index,
                        language: language.to_string(),
                        text_length: segment.char_count(),
                        attempts,
                        decision,
                        source: error,
                    });
                }
                next => next,
            };
        }
    }

    async fn advance(
        &self,
        state: SegmentState,
        segment: &Segment,
        profile: &VoiceProfile,
        language: &str,
    ) -> SegmentState {
        match state {
            SegmentState::Pending => SegmentState::InFlight { attempt: 1 },
            SegmentState::RetryScheduled { attempt, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                SegmentState::InFlight {
                    attempt: attempt + 1,
                }
            }
            SegmentState::InFlight { attempt } => {
                tracing::debug!(
                    segment_index = segment.index,
                    attempt = attempt,
                    text_length = segment.char_count(),
                    "Calling TTS provider"
                );

                match self
                    .tts_repo
                    .synthesize(&segment.text, &profile.voice, &profile.model, language)
                    .await
                {
                    Ok(audio) => SegmentState::Succeeded {
                        attempts: attempt,
                        audio,
                    },
                    Err(error) => {
                        let decision = classify(&error);
                        if decision.is_retryable() && self.policy.allows_another_attempt(attempt) {
                            let delay = self.policy.delay_after(attempt);
                            tracing::warn!(
                                segment_index = segment.index,
                                attempt = attempt,
                                max_attempts = self.policy.max_attempts,
                                delay_ms = delay.as_millis() as u64,
                                error = %error,
                                "Transient TTS failure, retrying"
                            );
                            SegmentState::RetryScheduled { attempt, delay }
                        } else {
                            SegmentState::Failed {
                                attempts: attempt,
                                decision,
                                error,
                            }
                        }
                    }
                }
            }
            terminal => terminal,
        }
    }
}
