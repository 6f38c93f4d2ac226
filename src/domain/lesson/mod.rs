pub mod collector;
pub mod error;
pub mod model;
pub mod service;

pub use collector::{collect_segments, collect_units, TextUnit};
pub use error::{LanguageError, LessonAudioError, StoreError};
pub use model::{LanguageList, LessonEntry, ListValue, PracticeItem, TextItem, TextValue};
pub use service::{LanguagePlan, LanguageReport, LanguageStatus, LessonAudioService, RunOutcome};
