//! Project archetype detection and minimum entry-point requirements.

use serde::{Deserialize, Serialize};

use super::file_map::FileMap;

const SCRIPT_EXTS: &[&str] = &["tsx", "jsx", "ts", "js"];

/// Kind of project a file map describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectArchetype {
    NextAppRouter,
    NextPagesRouter,
    Vite,
    Express,
    StaticHtml,
    Python,
    Unknown,
}

/// One required entry point, satisfied by any of its candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFile {
    /// How the requirement is reported when missing.
    pub label: String,
    pub candidates: Vec<String>,
}

impl RequiredFile {
    fn exact(path: &str) -> Self {
        Self {
            label: path.to_string(),
            candidates: vec![path.to_string()],
        }
    }

    /// `stem.{tsx,jsx,ts,js}` under each of `roots`.
    fn script(roots: &[&str], stem: &str) -> Self {
        let candidates = roots
            .iter()
            .flat_map(|root| SCRIPT_EXTS.iter().map(move |ext| format!("{root}{stem}.{ext}")))
            .collect();
        Self {
            label: format!("{}{stem}.{{{}}}", roots[0], SCRIPT_EXTS.join(",")),
            candidates,
        }
    }

    pub fn is_satisfied(&self, files: &FileMap) -> bool {
        self.candidates.iter().any(|c| files.contains_key(c))
    }
}

impl ProjectArchetype {
    /// Detect the archetype from file names and `package.json` content.
    pub fn detect(files: &FileMap) -> Self {
        let package = files.get("package.json").map(String::as_str);
        let has_dep = |name: &str| package.is_some_and(|p| p.contains(&format!("\"{name}\"")));
        let has_prefix = |prefix: &str| files.keys().any(|k| k.starts_with(prefix));
        let has_config = |stem: &str| files.keys().any(|k| k.starts_with(stem));

        if has_dep("next") || has_config("next.config.") {
            if has_prefix("pages/") || has_prefix("src/pages/") {
                if has_prefix("app/") || has_prefix("src/app/") {
                    return ProjectArchetype::NextAppRouter;
                }
                return ProjectArchetype::NextPagesRouter;
            }
            return ProjectArchetype::NextAppRouter;
        }
        if has_dep("vite") || has_config("vite.config.") {
            return ProjectArchetype::Vite;
        }
        if has_dep("express") {
            return ProjectArchetype::Express;
        }
        if files.keys().any(|k| k.ends_with(".py")) {
            return ProjectArchetype::Python;
        }
        if files.keys().any(|k| k.ends_with(".html") || k.ends_with(".htm")) {
            return ProjectArchetype::StaticHtml;
        }
        ProjectArchetype::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectArchetype::NextAppRouter => "next-app-router",
            ProjectArchetype::NextPagesRouter => "next-pages-router",
            ProjectArchetype::Vite => "vite",
            ProjectArchetype::Express => "express",
            ProjectArchetype::StaticHtml => "static-html",
            ProjectArchetype::Python => "python",
            ProjectArchetype::Unknown => "unknown",
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(
            self,
            ProjectArchetype::NextAppRouter
                | ProjectArchetype::NextPagesRouter
                | ProjectArchetype::Vite
                | ProjectArchetype::Express
        )
    }

    /// Minimum entry points the archetype needs to start.
    pub fn required_files(&self, files: &FileMap) -> Vec<RequiredFile> {
        match self {
            ProjectArchetype::NextAppRouter => vec![
                RequiredFile::script(&["app/", "src/app/"], "page"),
                RequiredFile::script(&["app/", "src/app/"], "layout"),
            ],
            ProjectArchetype::NextPagesRouter => {
                vec![RequiredFile::script(&["pages/", "src/pages/"], "index")]
            }
            ProjectArchetype::Vite => vec![
                RequiredFile::exact("index.html"),
                RequiredFile::script(&["src/"], "main"),
            ],
            ProjectArchetype::Express => {
                vec![RequiredFile::exact("package.json"), express_entry(files)]
            }
            ProjectArchetype::StaticHtml => vec![RequiredFile::exact("index.html")],
            ProjectArchetype::Python => python_entry(files).into_iter().collect(),
            ProjectArchetype::Unknown => Vec::new(),
        }
    }

    /// Labels of required entry points absent from `files`.
    pub fn missing_required(&self, files: &FileMap) -> Vec<String> {
        self.required_files(files)
            .into_iter()
            .filter(|r| !r.is_satisfied(files))
            .map(|r| r.label)
            .collect()
    }

    /// Command that installs and starts the project.
    pub fn run_command(&self, files: &FileMap) -> Option<String> {
        match self {
            _ if self.is_node() => {
                let scripts = package_scripts(files);
                let has = |name: &str| scripts.as_ref().is_some_and(|s| s.get(name).is_some());
                if has("dev") {
                    Some("npm install && npm run dev".to_string())
                } else if has("start") {
                    Some("npm install && npm start".to_string())
                } else {
                    let entry = express_entry(files)
                        .candidates
                        .into_iter()
                        .find(|c| files.contains_key(c))?;
                    Some(format!("npm install && node {entry}"))
                }
            }
            ProjectArchetype::StaticHtml => Some("python3 -m http.server 3000".to_string()),
            ProjectArchetype::Python => {
                let entry = python_entry(files)?
                    .candidates
                    .into_iter()
                    .find(|c| files.contains_key(c))?;
                if files.contains_key("requirements.txt") {
                    Some(format!("pip install -r requirements.txt && python3 {entry}"))
                } else {
                    Some(format!("python3 {entry}"))
                }
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn package_json(files: &FileMap) -> Option<serde_json::Value> {
    serde_json::from_str(files.get("package.json")?).ok()
}

fn package_scripts(files: &FileMap) -> Option<serde_json::Map<String, serde_json::Value>> {
    package_json(files)?.get("scripts")?.as_object().cloned()
}

fn express_entry(files: &FileMap) -> RequiredFile {
    let declared = package_json(files)
        .and_then(|p| p.get("main")?.as_str().map(|m| m.trim_start_matches("./").to_string()));
    if let Some(main) = declared {
        return RequiredFile::exact(&main);
    }
    let candidates: Vec<String> = ["server", "index", "app", "src/server", "src/index", "src/app"]
        .iter()
        .flat_map(|stem| ["js", "ts", "mjs"].iter().map(move |ext| format!("{stem}.{ext}")))
        .collect();
    RequiredFile {
        label: "server.js|index.js|app.js".to_string(),
        candidates,
    }
}

const PYTHON_ENTRIES: &[&str] = &[
    "main.py", "app.py", "manage.py", "run.py", "server.py", "src/main.py", "app/main.py",
];

/// Entry point of a Python project: a conventional entry file if present,
/// else a module with a `__main__` guard, else the first `.py` file.
fn python_entry(files: &FileMap) -> Option<RequiredFile> {
    let conventional = PYTHON_ENTRIES.iter().copied().find(|p| files.contains_key(*p));
    let py = || files.keys().filter(|k| k.ends_with(".py"));
    let entry = conventional
        .or_else(|| {
            py().find(|k| has_main_guard(&files[*k]))
                .map(String::as_str)
        })
        .or_else(|| py().next().map(String::as_str))?;
    Some(RequiredFile::exact(entry))
}

fn has_main_guard(source: &str) -> bool {
    source.lines().any(|line| {
        let line = line.trim();
        line.starts_with("if __name__") && line.contains("__main__")
    })
}
