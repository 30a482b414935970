//! Task classification.

use serde::{Deserialize, Serialize};

/// Kind of software a task asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    WebFrontend,
    BackendApi,
    DataScience,
    Mobile,
    DevOps,
    Database,
    General,
}

const WEB_KEYWORDS: &[&str] = &[
    "website", "web", "html", "css", "react", "vue", "angular", "frontend", "ui",
    "interface", "page", "landing", "portfolio", "button", "form", "navbar", "header",
    "footer", "responsive",
];

const BACKEND_KEYWORDS: &[&str] = &[
    "api", "backend", "server", "endpoint", "database query", "rest", "graphql",
    "microservice", "authentication", "crud",
];

const DATA_SCIENCE_KEYWORDS: &[&str] = &[
    "machine learning", "ml", "data analysis", "pandas", "numpy", "tensorflow", "pytorch",
    "model", "prediction", "classification", "regression", "neural network",
];

const MOBILE_KEYWORDS: &[&str] = &[
    "mobile app", "ios", "android", "swift", "kotlin", "react native", "flutter", "mobile",
];

const DEVOPS_KEYWORDS: &[&str] = &[
    "docker", "kubernetes", "k8s", "ci/cd", "pipeline", "terraform", "ansible",
    "infrastructure", "deployment",
];

const DATABASE_KEYWORDS: &[&str] = &[
    "database", "sql", "postgresql", "mysql", "mongodb", "query", "schema", "migration",
    "orm",
];

impl TaskCategory {
    /// Categories in classification priority order, with their keywords.
    const PRIORITY: [(TaskCategory, &'static [&'static str]); 6] = [
        (TaskCategory::WebFrontend, WEB_KEYWORDS),
        (TaskCategory::BackendApi, BACKEND_KEYWORDS),
        (TaskCategory::DataScience, DATA_SCIENCE_KEYWORDS),
        (TaskCategory::Mobile, MOBILE_KEYWORDS),
        (TaskCategory::DevOps, DEVOPS_KEYWORDS),
        (TaskCategory::Database, DATABASE_KEYWORDS),
    ];

    pub const ALL: [TaskCategory; 7] = [
        TaskCategory::WebFrontend,
        TaskCategory::BackendApi,
        TaskCategory::DataScience,
        TaskCategory::Mobile,
        TaskCategory::DevOps,
        TaskCategory::Database,
        TaskCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::WebFrontend => "web_frontend",
            TaskCategory::BackendApi => "backend_api",
            TaskCategory::DataScience => "data_science",
            TaskCategory::Mobile => "mobile",
            TaskCategory::DevOps => "devops",
            TaskCategory::Database => "database",
            TaskCategory::General => "general",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        Self::PRIORITY
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase().replace('-', "_"))
            .ok_or_else(|| format!("unknown task category: {s}"))
    }
}

/// Classify a task description.
///
/// Categories are tested in a fixed priority order and the first one whose
/// keyword appears anywhere in the lower-cased task wins, so "webapp" counts
/// as "web". [`TaskCategory::General`] is returned when nothing matches.
pub fn classify(task: &str) -> TaskCategory {
    let text = task.to_lowercase();
    TaskCategory::PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(TaskCategory::General)
}
