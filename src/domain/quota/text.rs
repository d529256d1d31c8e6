use html2text::from_read;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"));
static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Plain text of a submission: HTML removed, URLs dropped, whitespace collapsed
pub fn extract_text(text: &str) -> String {
    let plain_text = from_read(text.as_bytes(), usize::MAX);
    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}

/// Characters counted against the role's character limit
pub fn character_count(text: &str) -> i64 {
    extract_text(text).chars().count() as i64
}
