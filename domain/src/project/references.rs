//! Cross-file reference extraction and resolution.
//!
//! Extraction is table-driven: each [`SourceKind`] owns a list of regexes
//! whose first capture group is the referenced path. Adding a language means
//! adding a row to [`RULES`].

use std::sync::LazyLock;

use regex::Regex;

use super::file_map::FileMap;
use super::outcome::MissingReference;

/// Source file families that can reference other project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Script,
    Stylesheet,
    Python,
    Markup,
}

impl SourceKind {
    pub fn for_path(path: &str) -> Option<Self> {
        let ext = extension(path)?.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "vue" | "svelte" => {
                Some(SourceKind::Script)
            }
            "css" | "scss" | "sass" | "less" => Some(SourceKind::Stylesheet),
            "py" => Some(SourceKind::Python),
            "html" | "htm" => Some(SourceKind::Markup),
            _ => None,
        }
    }
}

struct Rule {
    kind: SourceKind,
    pattern: Regex,
}

fn rule(kind: SourceKind, pattern: &str) -> Rule {
    Rule {
        kind,
        pattern: Regex::new(pattern).expect("valid reference regex"),
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // import x from './x'; import { a } from "./x"; import type { T } from './t'
        rule(
            SourceKind::Script,
            r#"(?m)^\s*import\s+[\w*{}\s,$]+?\s+from\s+['"]([^'"]+)['"]"#,
        ),
        // import './styles.css'
        rule(SourceKind::Script, r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#),
        // export { a } from './a'; export * from './b'
        rule(
            SourceKind::Script,
            r#"(?m)^\s*export\s+[\w*{}\s,$]+?\s+from\s+['"]([^'"]+)['"]"#,
        ),
        rule(SourceKind::Script, r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#),
        rule(SourceKind::Script, r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#),
        rule(
            SourceKind::Stylesheet,
            r#"@import\s+(?:url\(\s*)?['"]?([^'")\s;]+)"#,
        ),
        // from .models import User / from .. import utils
        rule(
            SourceKind::Python,
            r"(?m)^\s*from\s+(\.+[\w.]*)\s+import\s+\(?\s*([\w, ]+)",
        ),
        rule(
            SourceKind::Markup,
            r#"(?is)<(link|script|img|source|iframe|a)\b[^>]*?\s(?:href|src)\s*=\s*["']([^"']+)["']"#,
        ),
    ]
});

/// Package names that are always external even when written like paths.
const KNOWN_EXTERNALS: &[&str] = &[
    "react", "react-dom", "react-router-dom", "next", "vue", "vue-router", "svelte",
    "express", "axios", "lodash", "tailwindcss", "vite", "jquery", "bootstrap",
];

/// Extensions tried when a reference omits one.
const SUFFIXES: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".mjs", ".vue", ".svelte", ".css", ".json",
];

const INDEX_FILES: &[&str] = &["index.js", "index.jsx", "index.ts", "index.tsx"];

/// Binary assets a text completion cannot produce; references to them are
/// not checked.
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "avif", "mp3", "mp4", "webm",
    "woff", "woff2", "ttf", "otf", "eot", "pdf",
];

/// A reference found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: SourceKind,
    /// The path as written.
    pub raw: String,
    /// For Python `from . import a, b`, the imported names.
    pub names: Vec<String>,
}

/// Extract every reference from `content`, in rule order.
pub fn extract_references(kind: SourceKind, content: &str) -> Vec<Reference> {
    let mut refs = Vec::new();
    for rule in RULES.iter().filter(|r| r.kind == kind) {
        for caps in rule.pattern.captures_iter(content) {
            let reference = match kind {
                SourceKind::Python => Reference {
                    kind,
                    raw: caps[1].to_string(),
                    names: caps[2]
                        .split(',')
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .collect(),
                },
                SourceKind::Markup => {
                    let tag = caps[1].to_ascii_lowercase();
                    let target = caps[2].to_string();
                    // Anchors usually point at routes, not files.
                    if tag == "a" && !is_html_page(&target) {
                        continue;
                    }
                    Reference {
                        kind,
                        raw: target,
                        names: Vec::new(),
                    }
                }
                _ => Reference {
                    kind,
                    raw: caps[1].to_string(),
                    names: Vec::new(),
                },
            };
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        }
    }
    refs
}

/// Whether a reference points outside the project.
pub fn is_external(kind: SourceKind, raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    if ["http://", "https://", "//", "data:", "mailto:", "tel:", "javascript:", "#"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
        || raw.contains("{{")
        || raw.contains("${")
        || raw.starts_with('%')
    {
        return true;
    }

    let first_segment = raw.split('/').next().unwrap_or(raw);
    if KNOWN_EXTERNALS.contains(&first_segment) {
        return true;
    }

    match kind {
        SourceKind::Script => !is_local_specifier(raw),
        // `@import "tailwindcss/base"` resolves through node_modules; a file
        // with an extension is local.
        SourceKind::Stylesheet => !is_local_specifier(raw) && extension(raw).is_none(),
        SourceKind::Python | SourceKind::Markup => false,
    }
}

fn is_local_specifier(raw: &str) -> bool {
    raw.starts_with("./")
        || raw.starts_with("../")
        || raw.starts_with('/')
        || raw.starts_with("@/")
        || raw.starts_with("~/")
}

/// Candidate project paths for `raw` referenced from `source`.
pub fn candidates(source: &str, reference: &Reference) -> Vec<String> {
    match reference.kind {
        SourceKind::Python => python_candidates(source, reference),
        _ => path_candidates(source, &reference.raw),
    }
}

fn path_candidates(source: &str, raw: &str) -> Vec<String> {
    let cleaned = raw.split(['?', '#']).next().unwrap_or(raw);
    let bases: Vec<String> = if let Some(rest) = cleaned
        .strip_prefix("@/")
        .or_else(|| cleaned.strip_prefix("~/"))
    {
        vec![format!("src/{rest}"), rest.to_string()]
    } else if let Some(rest) = cleaned.strip_prefix('/') {
        // Root-absolute in HTML and Vite means project root; also try public/.
        vec![rest.to_string(), format!("public/{rest}")]
    } else {
        match join(parent_dir(source), cleaned) {
            Some(path) => vec![path],
            None => return Vec::new(),
        }
    };

    let mut out = Vec::new();
    for base in bases {
        out.push(base.clone());
        if extension(&base).is_none() {
            out.extend(SUFFIXES.iter().map(|s| format!("{base}{s}")));
            out.extend(INDEX_FILES.iter().map(|i| format!("{base}/{i}")));
        } else if let Some(stem) = base.strip_suffix(".js") {
            // TypeScript sources are imported with a `.js` suffix.
            out.push(format!("{stem}.ts"));
            out.push(format!("{stem}.tsx"));
        }
    }
    out
}

fn python_candidates(source: &str, reference: &Reference) -> Vec<String> {
    let dots = reference.raw.chars().take_while(|c| *c == '.').count();
    let module = &reference.raw[dots..];

    let mut dir = parent_dir(source).to_string();
    for _ in 1..dots {
        match dir.rsplit_once('/') {
            Some((parent, _)) => dir = parent.to_string(),
            None if !dir.is_empty() => dir.clear(),
            None => return Vec::new(),
        }
    }

    let prefix = |p: String| if dir.is_empty() { p } else { format!("{dir}/{p}") };
    if module.is_empty() {
        let mut out = vec![prefix("__init__.py".to_string())];
        for name in &reference.names {
            out.push(prefix(format!("{name}.py")));
            out.push(prefix(format!("{name}/__init__.py")));
        }
        out
    } else {
        let module_path = module.replace('.', "/");
        vec![
            prefix(format!("{module_path}.py")),
            prefix(format!("{module_path}/__init__.py")),
        ]
    }
}

/// Collect every unresolved reference in the map.
pub fn find_missing(files: &FileMap) -> Vec<MissingReference> {
    let mut missing = Vec::new();
    for (path, content) in files {
        let Some(kind) = SourceKind::for_path(path) else {
            continue;
        };
        for reference in extract_references(kind, content) {
            if is_external(kind, &reference.raw) || is_asset(&reference.raw) {
                continue;
            }
            let found = candidates(path, &reference)
                .iter()
                .any(|candidate| files.contains_key(candidate));
            if !found {
                let raw = if reference.kind == SourceKind::Python && reference.raw == "." {
                    format!(".{}", reference.names.join(", ."))
                } else {
                    reference.raw.clone()
                };
                missing.push(MissingReference::new(path.clone(), raw));
            }
        }
    }
    missing
}

fn is_asset(raw: &str) -> bool {
    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    extension(path)
        .is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn is_html_page(target: &str) -> bool {
    let path = target.split(['?', '#']).next().unwrap_or(target);
    matches!(extension(path), Some("html" | "htm"))
}

fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Join `relative` onto `dir`, resolving `.` and `..`.
/// Returns `None` when the path escapes the project root.
fn join(dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(files: &[(&str, &str)]) -> FileMap {
        files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_es_imports() {
        let content = "import React from 'react';\nimport { a,\n  b } from \"./util\";\nimport './styles.css';\nexport * from './types';\nconst x = require('./legacy');\nconst Page = lazy(() => import('./Page'));";
        let raws: Vec<String> = extract_references(SourceKind::Script, content)
            .into_iter()
            .map(|r| r.raw)
            .collect();
        assert_eq!(
            raws,
            vec!["react", "./util", "./styles.css", "./types", "./legacy", "./Page"]
        );
    }

    #[test]
    fn test_extract_markup_skips_route_anchors() {
        let html = r#"<link rel="stylesheet" href="style.css"><a href="/about">About</a><a href="contact.html">C</a><script type="module" src="/src/main.tsx"></script>"#;
        let raws: Vec<String> = extract_references(SourceKind::Markup, html)
            .into_iter()
            .map(|r| r.raw)
            .collect();
        assert_eq!(raws, vec!["style.css", "contact.html", "/src/main.tsx"]);
    }

    #[test]
    fn test_external_detection() {
        assert!(is_external(SourceKind::Script, "react"));
        assert!(is_external(SourceKind::Script, "@tanstack/react-query"));
        assert!(is_external(SourceKind::Script, "node:fs"));
        assert!(!is_external(SourceKind::Script, "./a"));
        assert!(!is_external(SourceKind::Script, "@/components/Button"));
        assert!(is_external(SourceKind::Markup, "https://cdn.example.com/x.js"));
        assert!(!is_external(SourceKind::Markup, "style.css"));
        assert!(is_external(SourceKind::Stylesheet, "tailwindcss/base"));
        assert!(!is_external(SourceKind::Stylesheet, "base.css"));
    }

    #[test]
    fn test_relative_resolution() {
        let files = map(&[
            ("src/components/Button.tsx", "import { cx } from '../lib/cx';"),
            ("src/lib/cx.ts", "export const cx = () => '';"),
        ]);
        assert!(find_missing(&files).is_empty());
    }

    #[test]
    fn test_alias_and_index_resolution() {
        let files = map(&[
            ("src/App.tsx", "import Nav from '@/components/nav';"),
            ("src/components/nav/index.tsx", "export default function Nav() {}"),
        ]);
        assert!(find_missing(&files).is_empty());
    }

    #[test]
    fn test_ts_js_suffix_resolution() {
        let files = map(&[
            ("src/index.ts", "import { run } from './run.js';"),
            ("src/run.ts", "export function run() {}"),
        ]);
        assert!(find_missing(&files).is_empty());
    }

    #[test]
    fn test_escape_above_root_is_missing() {
        let files = map(&[("a.js", "import '../outside';")]);
        assert_eq!(
            find_missing(&files),
            vec![MissingReference::new("a.js", "../outside")]
        );
    }

    #[test]
    fn test_python_relative_imports() {
        let files = map(&[
            ("app/__init__.py", ""),
            ("app/main.py", "from .models import User\nfrom . import utils\n"),
            ("app/models.py", "class User: pass"),
            ("app/utils.py", "def f(): pass"),
        ]);
        assert!(find_missing(&files).is_empty());

        let broken = map(&[("app/main.py", "from .db import session\n")]);
        assert_eq!(
            find_missing(&broken),
            vec![MissingReference::new("app/main.py", ".db")]
        );
    }

    #[test]
    fn test_binary_assets_are_not_checked() {
        let files = map(&[(
            "index.html",
            r#"<link rel="icon" href="/favicon.ico"><img src="hero.png">"#,
        )]);
        assert!(find_missing(&files).is_empty());
    }

    #[test]
    fn test_css_import() {
        let files = map(&[("styles/main.css", "@import url('./base.css');\n@import 'https://fonts.googleapis.com/css';")]);
        assert_eq!(
            find_missing(&files),
            vec![MissingReference::new("styles/main.css", "./base.css")]
        );
    }
}
