use crate::domain::tts::language::fallback_order;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A text field given either once for all languages or per language
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    ByLanguage(BTreeMap<String, serde_json::Value>),
    Unrecognized(serde_json::Value),
}

impl TextValue {
    /// Resolve the text for `language`, falling back to zh then en
    pub fn resolve(&self, language: &str) -> Option<&str> {
        match self {
            TextValue::Plain(text) => Some(text.as_str()).filter(|t| !t.trim().is_empty()),
            TextValue::ByLanguage(map) => fallback_order(language).into_iter().find_map(|lang| {
                map.get(lang)
                    .and_then(serde_json::Value::as_str)
                    .filter(|t| !t.trim().is_empty())
            }),
            TextValue::Unrecognized(_) => None,
        }
    }
}

/// A list field given either once for all languages or per language
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListValue<T> {
    Plain(Vec<T>),
    ByLanguage(BTreeMap<String, LanguageList<T>>),
    Unrecognized(serde_json::Value),
}

/// One language's entry in a per-language list; non-lists are kept aside
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LanguageList<T> {
    Items(Vec<T>),
    Unrecognized(serde_json::Value),
}

impl<T> LanguageList<T> {
    fn items(&self) -> Option<&[T]> {
        match self {
            LanguageList::Items(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

impl<T> ListValue<T> {
    /// Resolve the list for `language`, falling back to zh then en
    pub fn resolve(&self, language: &str) -> &[T] {
        match self {
            ListValue::Plain(items) => items,
            ListValue::ByLanguage(map) => fallback_order(language)
                .into_iter()
                .find_map(|lang| map.get(lang).and_then(LanguageList::items))
                .unwrap_or(&[]),
            ListValue::Unrecognized(_) => &[],
        }
    }
}

/// A list entry expected to be a string; anything else is ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Text(String),
    Other(serde_json::Value),
}

impl TextItem {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextItem::Text(text) => Some(text),
            TextItem::Other(_) => None,
        }
    }
}

/// One practice exercise: a bare sentence or a titled list of steps
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PracticeItem {
    Text(String),
    Structured {
        #[serde(default)]
        title: Option<TextItem>,
        #[serde(default)]
        steps: Option<ListValue<TextItem>>,
    },
    Other(serde_json::Value),
}

/// Lesson record for one calendar date
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LessonEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub topic: Option<TextValue>,
    #[serde(default)]
    pub title: Option<TextValue>,
    #[serde(default)]
    pub summary: Option<TextValue>,
    #[serde(default)]
    pub key_points: Option<ListValue<TextItem>>,
    #[serde(default)]
    pub practice: Option<ListValue<PracticeItem>>,
    #[serde(default)]
    pub risk_notes: Option<TextValue>,
}

impl LessonEntry {
    /// Title text, taken from `topic` first and `title` otherwise
    pub fn resolve_title(&self, language: &str) -> Option<&str> {
        self.topic
            .as_ref()
            .and_then(|topic| topic.resolve(language))
            .or_else(|| self.title.as_ref().and_then(|title| title.resolve(language)))
    }
}
