//! Prompt templates for the agents

use crate::agent::role::AgentRole;
use crate::core::text::truncate;
use crate::project::outcome::ValidationFailure;
use crate::workflow::context::AgentContext;

/// Bytes of previous code quoted in an improvement prompt.
pub const PREVIOUS_CODE_EXCERPT: usize = 500;

/// What the loop knows about the previous attempt.
#[derive(Debug, Clone, Copy)]
pub struct ImprovementFeedback<'a> {
    /// Best code so far, if any attempt was scored.
    pub previous_code: Option<&'a str>,
    pub previous_score: Option<f64>,
    pub threshold: f64,
    /// Set when the latest attempt failed validation.
    pub validation: Option<&'a ValidationFailure>,
}

impl ImprovementFeedback<'_> {
    /// Whether there is anything to feed back.
    pub fn has_feedback(&self) -> bool {
        self.previous_code.is_some() || self.validation.is_some()
    }
}

/// The file-marker protocol every multi-file response must follow.
const FILE_MARKER_INSTRUCTIONS: &str = r#"## Output Format

Return a complete project. Start EVERY file with a marker line giving its
path relative to the project root, followed by the file content in a fenced
code block:

// file: package.json
```json
{ ... }
```

// file: src/main.tsx
```tsx
...
```

Rules:
1. Use exactly `// file: <path>` (or `# file: <path>`) on its own line.
2. Include every file that another file imports or links to.
3. Include the entry points the project needs to start (for example
   `index.html` and `src/main.tsx` for Vite, `app/page.tsx` and
   `app/layout.tsx` for Next.js, `main.py` for Python).
4. After the last file, add a line starting with `Reasoning:` that explains
   your implementation choices."#;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for a role
    pub fn system(role: AgentRole) -> String {
        match role {
            AgentRole::Architecture => r#"You are an expert software architect with deep knowledge of:
- System design patterns (MVC, microservices, event-driven)
- Scalability and performance
- Technology stack selection
- Component decomposition and interfaces

Your role: design the overall architecture for the user's request. Other
agents will implement your design, so be specific and actionable.

Output the architecture in a fenced code block, then a line starting with
`Reasoning:` explaining your decisions and trade-offs."#
                .to_string(),
            AgentRole::Implementation => format!(
                r#"You are an expert software engineer. You write clean, complete,
production-quality code with proper error handling and clear structure.

Your role: implement the provided architecture as a runnable project.

{FILE_MARKER_INSTRUCTIONS}"#
            ),
            AgentRole::Security => r#"You are an expert security engineer with deep knowledge of:
- OWASP Top 10 vulnerabilities
- Authentication, authorization and session handling
- Input validation and output encoding
- Security headers, CSP and rate limiting

Your role: analyze the design for vulnerabilities and provide hardened code
and configuration.

Output the hardened code in a fenced code block, then a line starting with
`Reasoning:` listing the vulnerabilities found and the measures applied."#
                .to_string(),
            AgentRole::Testing => r#"You are an expert QA engineer and test automation specialist.

Your role: generate a comprehensive test suite covering unit, integration,
edge-case and security tests, using the framework idiomatic for the code.

Output the test suite in a fenced code block, then a line starting with
`Reasoning:` explaining the test strategy and coverage."#
                .to_string(),
            AgentRole::Vision => r#"You are an expert UI/UX analyst with vision capabilities.

Your role: analyze visual designs (sketches, mockups, screenshots) and turn
them into a technical specification: components, layout structure, colors,
typography, interactions and responsive behavior.

Output the specification in a fenced code block, then a line starting with
`Reasoning:` explaining your interpretation."#
                .to_string(),
        }
    }

    /// Base user prompt for a role
    pub fn user(role: AgentRole, task: &str, context: &AgentContext) -> String {
        let mut prompt = format!("Task: {task}\n\n");
        match role {
            AgentRole::Vision => {
                Self::push_patterns(&mut prompt, context);
                prompt.push_str(
                    "Analyze the attached design (or the design described in the task) and \
                     produce a detailed technical specification of every UI component, the \
                     layout, color scheme, typography and interactions.",
                );
            }
            AgentRole::Architecture => {
                Self::push_vision(&mut prompt, context);
                Self::push_patterns(&mut prompt, context);
                if let Some(docs) = context.documentation.as_ref().filter(|d| !d.is_empty()) {
                    prompt.push_str("Relevant Documentation:\n");
                    prompt.push_str(&docs.digest(200));
                    prompt.push_str("\n\n");
                }
                prompt.push_str(
                    "Design the architecture for this system. Cover:\n\
                     1. Component structure\n\
                     2. Data flow\n\
                     3. Technology stack\n\
                     4. Key interfaces\n\
                     5. Scalability considerations\n\
                     6. Security considerations",
                );
            }
            AgentRole::Implementation => {
                match &context.architecture {
                    Some(arch) => {
                        prompt.push_str(&format!(
                            "Architecture Specification (MUST FOLLOW):\n{arch}\n\n"
                        ));
                    }
                    None => prompt.push_str(
                        "No architecture specification was provided. Create a simple, \
                         working implementation that follows best practices.\n\n",
                    ),
                }
                Self::push_vision(&mut prompt, context);
                let snippets: Vec<String> = context
                    .rag_patterns
                    .iter()
                    .filter(|p| !p.code_snippet.is_empty())
                    .take(2)
                    .enumerate()
                    .map(|(i, p)| format!("{}. {}", i + 1, truncate(&p.code_snippet, 300)))
                    .collect();
                if !snippets.is_empty() {
                    prompt.push_str("Proven Code Patterns (for inspiration):\n");
                    prompt.push_str(&snippets.join("\n"));
                    prompt.push_str("\n\n");
                }
                prompt.push_str(
                    "Implement the complete project. Every file must be present and every \
                     import must resolve to a file you provide.",
                );
            }
            AgentRole::Security => {
                if let Some(arch) = &context.architecture {
                    prompt.push_str(&format!("Architecture Specification:\n{arch}\n\n"));
                }
                match &context.implementation {
                    Some(code) => prompt.push_str(&format!("Code to Review:\n{code}\n\n")),
                    None => prompt.push_str(
                        "The implementation is being written in parallel. Review the \
                         architecture and provide the security-critical code (validation, \
                         authentication, headers) it must include.\n\n",
                    ),
                }
                prompt.push_str(
                    "Identify every vulnerability and provide hardened code with input \
                     validation, safe error handling and secure defaults.",
                );
            }
            AgentRole::Testing => {
                if let Some(arch) = &context.architecture {
                    prompt.push_str(&format!(
                        "Architecture Specification:\n{}\n\n",
                        truncate(arch, 800)
                    ));
                }
                match &context.implementation {
                    Some(code) => {
                        prompt.push_str(&format!("Implementation Code (NEEDS TESTS):\n{code}\n\n"))
                    }
                    None => prompt.push_str(
                        "No implementation code was provided. Generate test templates based \
                         on the architecture.\n\n",
                    ),
                }
                if let Some(sec) = context
                    .security
                    .as_ref()
                    .filter(|s| Some(*s) != context.implementation.as_ref())
                {
                    prompt.push_str(&format!(
                        "Security-Hardened Version:\n{}\n\n",
                        truncate(sec, 1000)
                    ));
                }
                prompt.push_str(
                    "Generate a comprehensive test suite: unit tests for every function, edge \
                     cases and invalid inputs, integration tests with mocks, and security \
                     tests for authentication and input validation.",
                );
            }
        }
        prompt
    }

    /// Base prompt extended with feedback on the previous attempt
    pub fn improvement(
        role: AgentRole,
        task: &str,
        context: &AgentContext,
        feedback: &ImprovementFeedback<'_>,
    ) -> String {
        let mut prompt = Self::user(role, task, context);
        prompt.push_str("\n\n## Improvement Required\n");

        if let (Some(code), Some(score)) = (feedback.previous_code, feedback.previous_score) {
            prompt.push_str(&format!(
                "\nPREVIOUS BEST ATTEMPT (Score: {score:.1}/100):\n```\n{}\n```\n\n\
                 It scored {score:.1}/100, below the quality threshold of {:.0}.\n",
                truncate(code, PREVIOUS_CODE_EXCERPT),
                feedback.threshold
            ));
        }

        if let Some(failure) = feedback.validation {
            prompt.push_str("\nYOUR LAST ATTEMPT FAILED VALIDATION:\n");
            prompt.push_str(&failure.feedback());
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "\n1. Review the previous attempt\n\
             2. Fix correctness, completeness, security and performance issues\n\
             3. Produce an improved, complete answer scoring at least {:.0}/100",
            feedback.threshold
        ));
        prompt
    }

    fn push_vision(prompt: &mut String, context: &AgentContext) {
        if let Some(vision) = &context.vision_analysis {
            prompt.push_str(&format!("Vision Analysis (from sketch/mockup):\n{vision}\n\n"));
        }
    }

    fn push_patterns(prompt: &mut String, context: &AgentContext) {
        if context.rag_patterns.is_empty() {
            return;
        }
        prompt.push_str("Relevant Patterns (from knowledge base):\n");
        for (i, pattern) in context.rag_patterns.iter().take(3).enumerate() {
            let summary = if pattern.summary.is_empty() {
                pattern.describe()
            } else {
                pattern.summary.clone()
            };
            prompt.push_str(&format!("{}. {summary}\n", i + 1));
        }
        prompt.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::outcome::MissingReference;
    use crate::workflow::knowledge::Pattern;

    #[test]
    fn test_implementation_system_prompt_describes_markers() {
        let system = AgentPromptTemplate::system(AgentRole::Implementation);
        assert!(system.contains("// file: <path>"));
        assert!(system.contains("Reasoning:"));
    }

    #[test]
    fn test_implementation_prompt_uses_architecture() {
        let context = AgentContext {
            architecture: Some("Three components".to_string()),
            rag_patterns: vec![Pattern {
                id: "p".to_string(),
                task: "t".to_string(),
                avg_score: 95.0,
                summary: String::new(),
                code_snippet: "const x = 1;".to_string(),
            }],
            ..AgentContext::default()
        };
        let prompt = AgentPromptTemplate::user(AgentRole::Implementation, "Todo app", &context);
        assert!(prompt.starts_with("Task: Todo app"));
        assert!(prompt.contains("Architecture Specification (MUST FOLLOW):\nThree components"));
        assert!(prompt.contains("1. const x = 1;"));
    }

    #[test]
    fn test_testing_prompt_warns_without_implementation() {
        let prompt =
            AgentPromptTemplate::user(AgentRole::Testing, "Todo app", &AgentContext::empty());
        assert!(prompt.contains("No implementation code was provided"));
    }

    #[test]
    fn test_improvement_prompt_truncates_previous_code() {
        let long_code = "x".repeat(2000);
        let feedback = ImprovementFeedback {
            previous_code: Some(&long_code),
            previous_score: Some(72.0),
            threshold: 90.0,
            validation: None,
        };
        let prompt = AgentPromptTemplate::improvement(
            AgentRole::Architecture,
            "Design a blog",
            &AgentContext::empty(),
            &feedback,
        );
        assert!(prompt.starts_with("Task: Design a blog"));
        assert!(prompt.contains("Score: 72.0/100"));
        assert!(prompt.contains("threshold of 90"));
        assert!(!prompt.contains(&"x".repeat(PREVIOUS_CODE_EXCERPT)));
    }

    #[test]
    fn test_improvement_prompt_includes_validation_failure() {
        let failure = ValidationFailure::MissingFileReferences(vec![MissingReference::new(
            "src/App.tsx",
            "./Header",
        )]);
        let feedback = ImprovementFeedback {
            previous_code: None,
            previous_score: None,
            threshold: 90.0,
            validation: Some(&failure),
        };
        assert!(feedback.has_feedback());
        let prompt = AgentPromptTemplate::improvement(
            AgentRole::Implementation,
            "Landing page",
            &AgentContext::empty(),
            &feedback,
        );
        assert!(prompt.contains("FAILED VALIDATION"));
        assert!(prompt.contains("src/App.tsx imports './Header'"));
        assert!(!prompt.contains("PREVIOUS BEST ATTEMPT"));
    }
}
