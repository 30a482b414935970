//! Domain layer for codeswarm
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agents
//!
//! A run drives specialized agents (architecture, implementation, security,
//! testing and optionally vision). Each produces an [`AgentOutput`]; the
//! implementation agent's output additionally carries [`ValidatedFiles`]
//! when its multi-file answer passed the [`FileValidator`].
//!
//! ## Model selection
//!
//! Tasks are classified into a [`TaskCategory`], which selects an ordered
//! model sequence. [`should_fallback`] decides when an agent escalates to
//! the next model.
//!
//! ## Text-to-project pipeline
//!
//! [`parse_response`] extracts code and reasoning from raw completions and
//! canonicalizes multi-file answers; the [`FileValidator`] turns them into a
//! checked file map.
//!
//! ## Learning
//!
//! Finished runs feed a [`PerformanceLog`] of per-agent statistics, and
//! high-scoring runs leave a [`Strategy`] behind.

pub mod agent;
pub mod config;
pub mod core;
pub mod learning;
pub mod parsing;
pub mod project;
pub mod prompt;
pub mod selection;
pub mod workflow;

// Re-export commonly used types
pub use agent::{AgentOutput, AgentRole, NoValidation, OutputValidator};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, model::Model};
pub use learning::{PerformanceLog, PerformanceSummary, Strategy};
pub use parsing::{ParsedResponse, parse_response};
pub use project::{
    DeploymentReceipt, DeploymentRequest, FileMap, FileValidator, MissingReference,
    ProjectArchetype, ValidatedFiles, ValidationFailure, ValidationOutcome,
};
pub use prompt::{AgentPromptTemplate, ImprovementFeedback};
pub use selection::{
    MAX_MODELS_PER_AGENT, ModelProfile, ModelRoster, TaskCategory, classify, fallback_rationale,
    model_sequence, needs_vision, next_model, should_fallback,
};
pub use workflow::{
    AgentContext, ArchitectureStage, BuildStage, DesignStage, DocResult, Documentation, Pattern,
    ResearchStage, TestingStage, WorkflowReport,
};
