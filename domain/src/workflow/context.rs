//! Typed, append-only workflow stages.
//!
//! Each stage owns the previous one and adds exactly one group of fields.
//! Transitions consume `self`, and earlier fields are reachable only through
//! shared references, so no stage can overwrite what an earlier stage wrote.
//!
//! ```text
//! ResearchStage --with_vision--> DesignStage --with_architecture--> ArchitectureStage
//!     --with_build--> BuildStage --with_testing--> TestingStage
//! ```

use crate::agent::output::AgentOutput;
use crate::agent::role::AgentRole;
use crate::selection::category::{TaskCategory, classify};

use super::knowledge::{Documentation, Pattern};

/// Read-only view of earlier results handed to an agent.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub rag_patterns: Vec<Pattern>,
    pub documentation: Option<Documentation>,
    pub vision_analysis: Option<String>,
    pub architecture: Option<String>,
    pub implementation: Option<String>,
    pub security: Option<String>,
}

impl AgentContext {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Task, category and retrieved knowledge.
#[derive(Debug, Clone)]
pub struct ResearchStage {
    task: String,
    category: TaskCategory,
    rag_patterns: Vec<Pattern>,
    documentation: Option<Documentation>,
}

impl ResearchStage {
    pub fn new(
        task: impl Into<String>,
        rag_patterns: Vec<Pattern>,
        documentation: Option<Documentation>,
    ) -> Self {
        let task = task.into();
        let category = classify(&task);
        Self {
            task,
            category,
            rag_patterns,
            documentation,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn category(&self) -> TaskCategory {
        self.category
    }

    pub fn rag_patterns(&self) -> &[Pattern] {
        &self.rag_patterns
    }

    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }

    /// Context for the vision agent: knowledge only.
    pub fn vision_context(&self) -> AgentContext {
        AgentContext {
            rag_patterns: self.rag_patterns.clone(),
            documentation: self.documentation.clone(),
            ..AgentContext::default()
        }
    }

    pub fn with_vision(self, vision: Option<AgentOutput>) -> DesignStage {
        DesignStage {
            research: self,
            vision,
        }
    }
}

/// Research plus the optional vision analysis.
#[derive(Debug, Clone)]
pub struct DesignStage {
    research: ResearchStage,
    vision: Option<AgentOutput>,
}

impl DesignStage {
    pub fn research(&self) -> &ResearchStage {
        &self.research
    }

    pub fn vision(&self) -> Option<&AgentOutput> {
        self.vision.as_ref()
    }

    fn vision_analysis(&self) -> Option<String> {
        self.vision.as_ref().map(|v| v.code().to_string())
    }

    /// Context for the architecture agent.
    pub fn architecture_context(&self) -> AgentContext {
        AgentContext {
            vision_analysis: self.vision_analysis(),
            ..self.research.vision_context()
        }
    }

    pub fn with_architecture(self, architecture: AgentOutput) -> ArchitectureStage {
        ArchitectureStage {
            design: self,
            architecture,
        }
    }
}

/// Design plus the architecture output.
#[derive(Debug, Clone)]
pub struct ArchitectureStage {
    design: DesignStage,
    architecture: AgentOutput,
}

impl ArchitectureStage {
    pub fn design(&self) -> &DesignStage {
        &self.design
    }

    pub fn research(&self) -> &ResearchStage {
        &self.design.research
    }

    pub fn architecture(&self) -> &AgentOutput {
        &self.architecture
    }

    /// Context for the implementation agent.
    pub fn implementation_context(&self) -> AgentContext {
        AgentContext {
            architecture: Some(self.architecture.code().to_string()),
            ..self.design.architecture_context()
        }
    }

    /// Context for the security agent. It runs alongside implementation, so
    /// it sees the architecture but no implementation.
    pub fn security_context(&self) -> AgentContext {
        AgentContext {
            architecture: Some(self.architecture.code().to_string()),
            vision_analysis: self.design.vision_analysis(),
            ..AgentContext::default()
        }
    }

    pub fn with_build(self, implementation: AgentOutput, security: AgentOutput) -> BuildStage {
        BuildStage {
            architecture: self,
            implementation,
            security,
        }
    }
}

/// Architecture plus implementation and security outputs.
#[derive(Debug, Clone)]
pub struct BuildStage {
    architecture: ArchitectureStage,
    implementation: AgentOutput,
    security: AgentOutput,
}

impl BuildStage {
    pub fn architecture_stage(&self) -> &ArchitectureStage {
        &self.architecture
    }

    pub fn implementation(&self) -> &AgentOutput {
        &self.implementation
    }

    pub fn security(&self) -> &AgentOutput {
        &self.security
    }

    /// Context for the testing agent: all three prior outputs.
    pub fn testing_context(&self) -> AgentContext {
        AgentContext {
            architecture: Some(self.architecture.architecture.code().to_string()),
            implementation: Some(self.implementation.code().to_string()),
            security: Some(self.security.code().to_string()),
            ..AgentContext::default()
        }
    }

    pub fn with_testing(self, testing: AgentOutput) -> TestingStage {
        TestingStage {
            build: self,
            testing,
        }
    }
}

/// Every agent output of a run.
#[derive(Debug, Clone)]
pub struct TestingStage {
    build: BuildStage,
    testing: AgentOutput,
}

impl TestingStage {
    pub fn research(&self) -> &ResearchStage {
        self.build.architecture.research()
    }

    pub fn vision(&self) -> Option<&AgentOutput> {
        self.build.architecture.design.vision()
    }

    pub fn architecture(&self) -> &AgentOutput {
        &self.build.architecture.architecture
    }

    pub fn implementation(&self) -> &AgentOutput {
        &self.build.implementation
    }

    pub fn security(&self) -> &AgentOutput {
        &self.build.security
    }

    pub fn testing(&self) -> &AgentOutput {
        &self.testing
    }

    /// The four scored outputs, in pipeline order.
    pub fn scored_outputs(&self) -> [(AgentRole, &AgentOutput); 4] {
        [
            (AgentRole::Architecture, self.architecture()),
            (AgentRole::Implementation, self.implementation()),
            (AgentRole::Security, self.security()),
            (AgentRole::Testing, self.testing()),
        ]
    }

    /// Mean quality score of the four scored agents.
    pub fn average_score(&self) -> f64 {
        let outputs = self.scored_outputs();
        outputs.iter().map(|(_, o)| o.score_or_zero()).sum::<f64>() / outputs.len() as f64
    }
}
