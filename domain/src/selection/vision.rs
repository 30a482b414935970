//! Deciding whether a task needs the vision agent.

const VISUAL_KEYWORDS: &[&str] = &[
    "sketch", "mockup", "screenshot", "image", "picture", "design", "figma", "wireframe",
    "ui", "layout", "photo", "drawing", "diagram",
];

/// True when an image was supplied or the task talks about visual designs.
pub fn needs_vision(task: &str, has_image: bool) -> bool {
    if has_image {
        return true;
    }
    let text = task.to_lowercase();
    VISUAL_KEYWORDS.iter().any(|kw| contains_word(&text, kw))
}

/// Whether `keyword` occurs in `text` on word boundaries.
///
/// A trailing plural `s` is allowed so "wireframes" matches "wireframe".
/// Without the boundary check "ui" would match inside "build" and pull the
/// vision agent into text-only tasks.
fn contains_word(text: &str, keyword: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric();
    text.match_indices(keyword).any(|(start, _)| {
        let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_word(c));
        let rest = &text[start + keyword.len()..];
        let mut after = rest.chars();
        let after_ok = match after.next() {
            None => true,
            Some('s') => after.next().is_none_or(|c| !is_word(c)),
            Some(c) => !is_word(c),
        };
        before_ok && after_ok
    })
}
