//! Retry classification and backoff for provider calls
//!
//! A failure is judged by walking its error chain: first by concrete type
//! (transport errors, I/O errors), then by OS error code, and only then by
//! looking for known transient phrases in the messages. The last step covers
//! SDKs that flatten their transport errors into strings.

use super::error::ProviderError;
use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;

/// Message fragments that mark a failure as transient
const TRANSIENT_KEYWORDS: &[&str] = &[
    "ssl",
    "connection aborted",
    "connection reset",
    "max retries",
    "timed out",
    "unexpected eof",
    "protocol",
    "eof occurred",
    "connection closed",
];

/// Transport-level I/O failures that are worth another attempt
const TRANSIENT_IO_KINDS: &[ErrorKind] = &[
    ErrorKind::ConnectionReset,
    ErrorKind::ConnectionAborted,
    ErrorKind::TimedOut,
    ErrorKind::BrokenPipe,
    ErrorKind::UnexpectedEof,
];

/// OS error classes (ECONNRESET, ECONNABORTED, ETIMEDOUT, EPIPE)
const TRANSIENT_OS_KINDS: &[ErrorKind] = &[
    ErrorKind::ConnectionReset,
    ErrorKind::ConnectionAborted,
    ErrorKind::TimedOut,
    ErrorKind::BrokenPipe,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retryable,
    Fatal,
}

impl RetryDecision {
    pub fn is_retryable(&self) -> bool {
        *self == RetryDecision::Retryable
    }
}

impl std::fmt::Display for RetryDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryDecision::Retryable => write!(f, "retryable"),
            RetryDecision::Fatal => write!(f, "fatal"),
        }
    }
}

/// Classify a provider failure as retryable or fatal
pub fn classify(error: &ProviderError) -> RetryDecision {
    let chain = error_chain(error);

    if chain.iter().any(|e| is_transient_type(*e)) {
        return RetryDecision::Retryable;
    }
    if chain.iter().any(|e| is_transient_os_error(*e)) {
        return RetryDecision::Retryable;
    }
    if chain.iter().any(|e| has_transient_message(&e.to_string())) {
        return RetryDecision::Retryable;
    }

    RetryDecision::Fatal
}

/// The error itself followed by every underlying cause
fn error_chain(error: &ProviderError) -> Vec<&(dyn StdError + 'static)> {
    let mut chain: Vec<&(dyn StdError + 'static)> = vec![error as &(dyn StdError + 'static)];
    match error {
        ProviderError::Transport(inner) => chain.extend(sources(inner)),
        ProviderError::Io(inner) => chain.extend(sources(inner)),
        // transparent: the anyhow chain starts with the wrapped error itself
        ProviderError::Other(inner) => chain.extend(inner.chain()),
        ProviderError::Api { .. } | ProviderError::InvalidResponse(_) => {}
    }
    chain
}

fn sources<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |&e| e.source())
}

fn is_transient_type(error: &(dyn StdError + 'static)) -> bool {
    if let Some(err) = error.downcast_ref::<reqwest::Error>() {
        return err.is_connect() || err.is_timeout();
    }
    if let Some(err) = error.downcast_ref::<std::io::Error>() {
        return TRANSIENT_IO_KINDS.contains(&err.kind());
    }
    false
}

fn is_transient_os_error(error: &(dyn StdError + 'static)) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .and_then(std::io::Error::raw_os_error)
        .map(|code| std::io::Error::from_raw_os_error(code).kind())
        .is_some_and(|kind| TRANSIENT_OS_KINDS.contains(&kind))
}

fn has_transient_message(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_KEYWORDS.iter().any(|keyword| message.contains(keyword))
}

/// Bounded attempts with exponential backoff between them
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per segment, the first call included
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            ..Self::default()
        }
    }

    /// Policy without waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as i32;
        let delay = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_backoff.as_secs_f64()).max(0.0))
    }

    pub fn allows_another_attempt(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
