use serde::{Deserialize, Serialize};

/// Fallback chain applied to every language-keyed lesson field
pub const FALLBACK_LANGUAGES: &[&str] = &["zh", "en"];

/// ISO 639-1 language codes the providers know voices for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Chinese => "zh",
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Japanese => "ja",
            LanguageCode::Korean => "ko",
        }
    }

    /// Parse a language tag such as `zh`, `en-US` or `ES`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_lowercase();
        match primary.as_str() {
            "zh" => Some(LanguageCode::Chinese),
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            "ja" => Some(LanguageCode::Japanese),
            "ko" => Some(LanguageCode::Korean),
            _ => None,
        }
    }

    /// English language name, as DashScope expects in `language_type`
    pub fn english_name(&self) -> &'static str {
        match self {
            LanguageCode::Chinese => "Chinese",
            LanguageCode::English => "English",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::German => "German",
            LanguageCode::Italian => "Italian",
            LanguageCode::Portuguese => "Portuguese",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Korean => "Korean",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Languages tried, in order, when resolving a language-keyed field
pub fn fallback_order(requested: &str) -> Vec<&str> {
    let mut order = vec![requested];
    for fallback in FALLBACK_LANGUAGES {
        if !order.contains(fallback) {
            order.push(fallback);
        }
    }
    order
}

/// Parse a comma separated language list, dropping blanks and duplicates
pub fn parse_language_list(raw: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for language in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        let language = language.to_string();
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    languages
}
