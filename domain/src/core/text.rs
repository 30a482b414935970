//! Text utilities for the domain layer.

/// Words ignored when extracting keywords from a task description.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "in", "on", "at", "for", "to", "of", "and", "or", "with",
];

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Extract search keywords from free text.
///
/// Lower-cases, drops stop words and words of three characters or fewer,
/// and keeps at most `limit` keywords in their original order.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '/'))
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .take(limit)
        .map(str::to_string)
        .collect()
}
