use serde::Serialize;

/// Part of the lesson a segment was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Title,
    Summary,
    KeyPoint,
    PracticeTitle,
    PracticeStep,
    RiskNotes,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Title => "title",
            SegmentKind::Summary => "summary",
            SegmentKind::KeyPoint => "key_point",
            SegmentKind::PracticeTitle => "practice_title",
            SegmentKind::PracticeStep => "practice_step",
            SegmentKind::RiskNotes => "risk_notes",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One unit of text sent to the provider in a single call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Position in reading order across the whole lesson
    pub index: usize,
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Audio produced for exactly one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFragment {
    pub index: usize,
    /// File-name friendly label derived from the segment text
    pub label: String,
    pub audio: Vec<u8>,
}
