use super::model::{LessonEntry, PracticeItem, TextItem};
use crate::domain::tts::{split_by_punctuation, Segment, SegmentKind};

/// Raw text taken from a lesson, before numbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub kind: SegmentKind,
    pub text: String,
}

impl TextUnit {
    fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Walk the lesson in reading order and produce the text units to speak.
///
/// Order: title, summary (split), key points, practice titles and steps,
/// risk notes (split). Blank units are dropped.
pub fn collect_units(entry: &LessonEntry, language: &str) -> Vec<TextUnit> {
    let mut units = Vec::new();

    if let Some(title) = entry.resolve_title(language) {
        units.push(TextUnit::new(SegmentKind::Title, title));
    }

    if let Some(summary) = entry.summary.as_ref().and_then(|s| s.resolve(language)) {
        units.extend(
            split_by_punctuation(summary)
                .into_iter()
                .map(|part| TextUnit::new(SegmentKind::Summary, part)),
        );
    }

    if let Some(points) = &entry.key_points {
        units.extend(
            points
                .resolve(language)
                .iter()
                .filter_map(TextItem::as_str)
                .map(|point| TextUnit::new(SegmentKind::KeyPoint, point)),
        );
    }

    if let Some(practice) = &entry.practice {
        for item in practice.resolve(language) {
            collect_practice_item(item, language, &mut units);
        }
    }

    if let Some(risk) = entry.risk_notes.as_ref().and_then(|r| r.resolve(language)) {
        units.extend(
            split_by_punctuation(risk)
                .into_iter()
                .map(|part| TextUnit::new(SegmentKind::RiskNotes, part)),
        );
    }

    units.retain(|unit| !unit.text.trim().is_empty());
    units
}

fn collect_practice_item(item: &PracticeItem, language: &str, units: &mut Vec<TextUnit>) {
    match item {
        PracticeItem::Text(text) => units.push(TextUnit::new(SegmentKind::PracticeStep, text.as_str())),
        PracticeItem::Structured { title, steps } => {
            if let Some(title) = title.as_ref().and_then(TextItem::as_str) {
                units.push(TextUnit::new(SegmentKind::PracticeTitle, title));
            }
            if let Some(steps) = steps {
                units.extend(
                    steps
                        .resolve(language)
                        .iter()
                        .filter_map(TextItem::as_str)
                        .map(|step| TextUnit::new(SegmentKind::PracticeStep, step)),
                );
            }
        }
        PracticeItem::Other(_) => {}
    }
}

/// Collect the lesson's units and number them in reading order
pub fn collect_segments(entry: &LessonEntry, language: &str) -> Vec<Segment> {
    collect_units(entry, language)
        .into_iter()
        .enumerate()
        .map(|(index, unit)| Segment {
            index,
            kind: unit.kind,
            text: unit.text,
        })
        .collect()
}
