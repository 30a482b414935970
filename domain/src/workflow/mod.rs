//! Workflow domain: stage records, gathered knowledge and the final report.

pub mod context;
pub mod knowledge;
pub mod report;

pub use context::{
    AgentContext, ArchitectureStage, BuildStage, DesignStage, ResearchStage, TestingStage,
};
pub use knowledge::{DocResult, Documentation, Pattern};
pub use report::WorkflowReport;
