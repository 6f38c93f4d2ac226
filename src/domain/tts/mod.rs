pub mod error;
pub mod language;
pub mod retry;
pub mod segment;
pub mod service;
pub mod text;

pub use error::{ProviderError, SynthesisError};
pub use language::LanguageCode;
pub use retry::{classify, RetryDecision, RetryPolicy};
pub use segment::{AudioFragment, Segment, SegmentKind};
pub use service::{SegmentState, SynthesisService, SynthesisServiceApi};
pub use text::{normalize_text, split_by_punctuation};
