pub mod lesson;
pub mod tts;
