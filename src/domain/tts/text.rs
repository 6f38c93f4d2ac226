use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on the characters sent to the provider in one request
pub const MAX_SEGMENT_CHARS: usize = 280;

/// Minimum characters a segment should hold before a natural break is taken
pub const MIN_SEGMENT_CHARS: usize = 100;

const _: () = assert!(MIN_SEGMENT_CHARS <= MAX_SEGMENT_CHARS);

/// Characters that end a sentence and are safe to break after
pub const SAFE_PUNCTUATION: &[char] = &['。', '！', '？', '.', '!', '?', ';', '；', '\n'];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x{3000}]+").expect("valid regex"));

/// Trim the text and collapse every whitespace run (full-width space included)
/// into a single ASCII space
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").trim().to_string()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn is_safe_break(ch: char) -> bool {
    SAFE_PUNCTUATION.contains(&ch)
}

/// Split a long text into speech-friendly segments.
///
/// Breaks are taken after safe punctuation once a segment holds at least
/// `MIN_SEGMENT_CHARS`. A short trailing remainder is merged into the previous
/// segment while the result stays under `MAX_SEGMENT_CHARS`; anything still over
/// the cap (text without punctuation) is sliced into fixed-size chunks.
pub fn split_by_punctuation(text: &str) -> Vec<String> {
    let text = normalize_text(text);
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(&text) <= MAX_SEGMENT_CHARS {
        return vec![text];
    }

    let mut parts: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut length = 0usize;

    for ch in text.chars() {
        buffer.push(ch);
        length += 1;

        // the forced break at the cap is covered because MIN <= MAX
        if is_safe_break(ch) && length >= MIN_SEGMENT_CHARS {
            let flushed = buffer.trim();
            if !flushed.is_empty() {
                parts.push(flushed.to_string());
            }
            buffer.clear();
            length = 0;
        }
    }

    let tail = buffer.trim();
    if !tail.is_empty() {
        match parts.last_mut() {
            Some(last) if char_len(tail) + char_len(last) < MAX_SEGMENT_CHARS => last.push_str(tail),
            _ => parts.push(tail.to_string()),
        }
    }

    parts
        .into_iter()
        .flat_map(|part| {
            if char_len(&part) > MAX_SEGMENT_CHARS {
                force_chunks(&part, MAX_SEGMENT_CHARS)
            } else {
                vec![part]
            }
        })
        .collect()
}

/// Slice text into consecutive chunks of at most `cap` characters
pub fn force_chunks(text: &str, cap: usize) -> Vec<String> {
    let text = text.trim();
    if char_len(text) <= cap {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(cap.max(1))
        .map(|chunk| chunk.iter().collect::<String>())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("valid regex"));

const SLUG_MAX_CHARS: usize = 40;

/// ASCII-only file-name label for a segment, `fallback` when nothing survives
pub fn slugify(text: &str, fallback: &str) -> String {
    let ascii: String = normalize_text(text).chars().filter(char::is_ascii).collect();
    let slug = NON_SLUG.replace_all(&ascii, "-");
    let slug: String = slug.trim_matches('-').chars().take(SLUG_MAX_CHARS).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}
