//! Response parser: turns raw model text into `(code, reasoning)`.

use serde::{Deserialize, Serialize};

use super::language::{fence_tag, split_fenced_body};
use super::markers::{MarkerStyle, marker_path, render_sections, split_sections};

/// Result of parsing one model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Extracted code. For multi-file responses this is the canonical
    /// marker-delimited blob.
    pub code: String,
    pub reasoning: String,
    /// Whether the response used the file-marker protocol.
    pub multi_file: bool,
}

/// Parse a raw model response.
///
/// If any line carries a file marker, every marker section is kept and the
/// code is re-rendered with canonical markers. Otherwise the first fenced
/// block is the code and the text after it is the reasoning. A response
/// with no fence at all yields empty code and is kept only as reasoning.
pub fn parse_response(raw: &str) -> ParsedResponse {
    if raw.lines().any(|line| marker_path(line, MarkerStyle::Strict).is_some()) {
        parse_multi_file(raw)
    } else {
        parse_single(raw)
    }
}

fn parse_single(raw: &str) -> ParsedResponse {
    let lines: Vec<&str> = raw.lines().collect();
    let Some(fence_at) = lines.iter().position(|line| fence_tag(line).is_some()) else {
        return ParsedResponse {
            code: String::new(),
            reasoning: raw.trim().to_string(),
            multi_file: false,
        };
    };

    let (code, tail) = split_fenced_body(&lines[fence_at..].join("\n"));
    ParsedResponse {
        code,
        reasoning: text_before_fence(&tail),
        multi_file: false,
    }
}

fn parse_multi_file(raw: &str) -> ParsedResponse {
    let lines: Vec<&str> = raw.lines().collect();
    let last_marker = lines
        .iter()
        .rposition(|line| marker_path(line, MarkerStyle::Strict).is_some())
        .unwrap_or(0);

    let reasoning_at = lines
        .iter()
        .enumerate()
        .skip(last_marker + 1)
        .rev()
        .find_map(|(i, line)| reasoning_label(line).map(|rest| (i, rest)));

    let (body, explicit_reasoning) = match reasoning_at {
        Some((i, first)) => {
            let mut reasoning = vec![first];
            reasoning.extend(&lines[i + 1..]);
            (lines[..i].join("\n"), Some(reasoning.join("\n").trim().to_string()))
        }
        None => (raw.to_string(), None),
    };

    let sections = split_sections(&body, MarkerStyle::Strict);
    let reasoning = explicit_reasoning.unwrap_or_else(|| {
        sections
            .last()
            .map(|s| strip_fence_lines(&s.tail))
            .unwrap_or_default()
    });
    let code = render_sections(sections.iter().map(|s| (s.path.as_str(), s.content.as_str())));

    ParsedResponse {
        code,
        reasoning,
        multi_file: true,
    }
}

/// If `line` starts a `Reasoning:` block, return the text after the label.
fn reasoning_label(line: &str) -> Option<&str> {
    let trimmed = line.trim().trim_start_matches(['#', '*', ' ']);
    let head = trimmed.get(..10)?;
    if !head.eq_ignore_ascii_case("reasoning:") {
        return None;
    }
    Some(trimmed[10..].trim_start_matches(['*', ' ']))
}

fn strip_fence_lines(text: &str) -> String {
    text.lines()
        .filter(|line| fence_tag(line).is_none())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Prose after a closing fence, up to the next opening fence.
fn text_before_fence(text: &str) -> String {
    text.lines()
        .take_while(|line| fence_tag(line).is_none())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
