//! File-marker protocol.
//!
//! Multi-file output is a sequence of sections, each introduced by a marker
//! line such as `// file: src/App.tsx` or `# file: app.py`. The canonical
//! form written back by the parser is `# File: <path>`.

use std::sync::LazyLock;

use regex::Regex;

use super::language::split_fenced_body;

/// Marker accepted from raw model output.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?://|#)\s*file:\s*(.+)$").expect("valid marker regex")
});

/// Marker accepted when re-parsing a blob; also allows CSS-style comments.
static LENIENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?://|#|/\*)\s*file:\s*(.+?)\s*(?:\*/)?$").expect("valid marker regex")
});

/// Prefix of the canonical marker line.
pub const CANONICAL_MARKER: &str = "# File: ";

/// Which marker syntax to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `//` or `#` comments only.
    Strict,
    /// Additionally `/* file: x */`.
    Lenient,
}

impl MarkerStyle {
    fn regex(self) -> &'static Regex {
        match self {
            MarkerStyle::Strict => &MARKER,
            MarkerStyle::Lenient => &LENIENT_MARKER,
        }
    }
}

/// One file section cut from a marker-delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    pub path: String,
    /// Body with fence wrappers removed.
    pub content: String,
    /// Text following the closing fence of this section, if any.
    pub tail: String,
}

/// Return the normalized path if `line` is a marker line.
pub fn marker_path(line: &str, style: MarkerStyle) -> Option<String> {
    let caps = style.regex().captures(line.trim())?;
    let path = normalize_path(caps.get(1)?.as_str());
    (!path.is_empty()).then_some(path)
}

/// Check whether any line of `text` is a marker.
pub fn contains_markers(text: &str, style: MarkerStyle) -> bool {
    text.lines().any(|line| marker_path(line, style).is_some())
}

/// Normalize a marker path: strip quoting, leading `./` and leading `/`.
pub fn normalize_path(raw: &str) -> String {
    let mut path = raw
        .trim()
        .trim_matches(|c| matches!(c, '`' | '"' | '\'' | '*'))
        .trim()
        .replace('\\', "/");
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest.to_string();
        } else {
            break;
        }
    }
    path
}

/// Cut `text` into file sections. Text before the first marker is ignored.
pub fn split_sections(text: &str, style: MarkerStyle) -> Vec<FileSection> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(path) = marker_path(line, style) {
            if let Some((prev, body)) = current.take() {
                sections.push(section(prev, &body));
            }
            current = Some((path, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((path, body)) = current {
        sections.push(section(path, &body));
    }
    sections
}

fn section(path: String, body: &[&str]) -> FileSection {
    let (content, tail) = split_fenced_body(&body.join("\n"));
    FileSection { path, content, tail }
}

/// Render `(path, content)` pairs as a canonical marker-delimited blob.
pub fn render_sections<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    files
        .into_iter()
        .map(|(path, content)| format!("{CANONICAL_MARKER}{path}\n{}\n", content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_path_variants() {
        assert_eq!(marker_path("// file: src/App.tsx", MarkerStyle::Strict).as_deref(), Some("src/App.tsx"));
        assert_eq!(marker_path("# File: app.py", MarkerStyle::Strict).as_deref(), Some("app.py"));
        assert_eq!(marker_path("  //FILE:  ./index.html ", MarkerStyle::Strict).as_deref(), Some("index.html"));
        assert_eq!(marker_path("// file: `/src/main.ts`", MarkerStyle::Strict).as_deref(), Some("src/main.ts"));
        assert_eq!(marker_path("const file = 1;", MarkerStyle::Strict), None);
    }

    #[test]
    fn test_css_marker_only_lenient() {
        let line = "/* file: styles/site.css */";
        assert_eq!(marker_path(line, MarkerStyle::Strict), None);
        assert_eq!(marker_path(line, MarkerStyle::Lenient).as_deref(), Some("styles/site.css"));
    }

    #[test]
    fn test_split_sections_ignores_preamble() {
        let text = "Here is the project.\n// file: a.js\nexport const a = 1;\n// file: b.js\nimport './a';";
        let sections = split_sections(text, MarkerStyle::Strict);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].path, "a.js");
        assert_eq!(sections[0].content, "export const a = 1;");
        assert_eq!(sections[1].content, "import './a';");
    }

    #[test]
    fn test_split_sections_fenced() {
        let text = "// file: a.py\n```python\nprint('a')\n```\n\n// file: b.py\n```python\nprint('b')\n```\nDone.";
        let sections = split_sections(text, MarkerStyle::Strict);
        assert_eq!(sections[0].content, "print('a')");
        assert_eq!(sections[1].content, "print('b')");
        assert_eq!(sections[1].tail, "Done.");
    }

    #[test]
    fn test_render_is_reparseable() {
        let blob = render_sections([("a.js", "export const a = 1;\n"), ("b.js", "import './a';")]);
        assert!(blob.starts_with("# File: a.js\n"));
        let sections = split_sections(&blob, MarkerStyle::Lenient);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].path, "b.js");
        assert_eq!(sections[1].content, "import './a';");
    }
}
