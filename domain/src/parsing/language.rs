//! Fenced code block helpers.
//!
//! Models wrap code in Markdown fences (` ```tsx `). When a bare fence is
//! followed by a line holding only a language name, that line is treated as
//! the tag only if it is one of the identifiers below; anything else is kept
//! as content so a real first line is never silently dropped.

/// Language identifiers accepted on an opening fence.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "bash", "c", "c++", "cpp", "cs", "csharp", "css", "dart", "diff", "docker",
    "dockerfile", "env", "go", "golang", "graphql", "html", "ini", "java",
    "javascript", "js", "json", "jsonc", "jsx", "kotlin", "kt", "less", "lua",
    "makefile", "markdown", "md", "php", "plaintext", "py", "python", "r", "rb",
    "ruby", "rust", "rs", "sass", "scala", "scss", "sh", "shell", "sql",
    "svelte", "swift", "text", "toml", "ts", "tsx", "txt", "typescript", "vue",
    "xml", "yaml", "yml", "zsh",
];

/// Check whether a fence tag names a known language (case-insensitive).
pub fn is_known_language(tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    KNOWN_LANGUAGES.contains(&tag.as_str())
}

/// If `line` is a Markdown fence, return its tag (possibly empty).
pub fn fence_tag(line: &str) -> Option<&str> {
    line.trim().strip_prefix("```").map(str::trim)
}

/// Whether `line` is a bare language identifier, as emitted when a model
/// puts the tag on its own line after a bare fence.
fn is_detached_tag(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && is_known_language(line)
}

/// Split a section body into `(content, tail)`.
///
/// A leading fence wrapper is removed, together with a detached language
/// tag line when the fence itself is bare. Content ends at the wrapper's
/// closing fence (a bare ` ``` ` that does not close a nested tagged block);
/// whatever follows it is returned as the tail. Unfenced bodies are
/// returned whole with an empty tail.
pub fn split_fenced_body(body: &str) -> (String, String) {
    let lines: Vec<&str> = body.lines().collect();

    let mut start = 0;
    while start < lines.len() && lines[start].trim().is_empty() {
        start += 1;
    }
    if let Some(tag) = lines.get(start).and_then(|l| fence_tag(l)) {
        start += 1;
        if tag.is_empty() && lines.get(start).is_some_and(|l| is_detached_tag(l)) {
            start += 1;
        }
    }

    let mut inner_open = false;
    for (i, line) in lines.iter().enumerate().skip(start) {
        let Some(tag) = fence_tag(line) else {
            continue;
        };
        if !tag.is_empty() {
            inner_open = true;
        } else if inner_open {
            inner_open = false;
        } else {
            let content = lines[start..i].join("\n");
            let tail = lines[i + 1..].join("\n");
            return (content.trim().to_string(), tail.trim().to_string());
        }
    }

    let content = lines.get(start..).map(|l| l.join("\n")).unwrap_or_default();
    (content.trim().to_string(), String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert!(is_known_language("tsx"));
        assert!(is_known_language("Python"));
        assert!(!is_known_language("title=app.js"));
        assert!(KNOWN_LANGUAGES.len() >= 40);
    }

    #[test]
    fn test_fence_tag() {
        assert_eq!(fence_tag("```tsx"), Some("tsx"));
        assert_eq!(fence_tag("  ```  "), Some(""));
        assert_eq!(fence_tag("const x = 1;"), None);
    }

    #[test]
    fn test_split_wrapped_body() {
        let (content, tail) = split_fenced_body("```js\nconsole.log(1)\n```\nThis logs one.");
        assert_eq!(content, "console.log(1)");
        assert_eq!(tail, "This logs one.");
    }

    #[test]
    fn test_split_unfenced_body() {
        let (content, tail) = split_fenced_body("\nconsole.log(1)\n");
        assert_eq!(content, "console.log(1)");
        assert!(tail.is_empty());
    }

    #[test]
    fn test_split_keeps_nested_tagged_blocks() {
        let body = "```markdown\n# App\n```bash\nnpm install\n```\nRun it.\n```";
        let (content, tail) = split_fenced_body(body);
        assert_eq!(content, "# App\n```bash\nnpm install\n```\nRun it.");
        assert!(tail.is_empty());
    }

    #[test]
    fn test_split_detached_tag_line() {
        let (content, _) = split_fenced_body("```\npython\nprint(1)\n```");
        assert_eq!(content, "print(1)");
    }

    #[test]
    fn test_split_keeps_unknown_first_line() {
        let (content, _) = split_fenced_body("```\nhello world\n```");
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_split_marker_inside_fence() {
        // Marker sat inside the fence, so the body ends with the closing
        // fence and the next file's opener.
        let (content, tail) = split_fenced_body("export const a = 1;\n```\n```ts");
        assert_eq!(content, "export const a = 1;");
        assert_eq!(tail, "```ts");
    }
}
