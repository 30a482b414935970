//! Run Workflow use case
//!
//! Orchestrates a full CodeSwarm run: knowledge retrieval, the optional vision
//! analysis, the four scored agents, aggregation, and the optional pattern
//! storage, learning and deployment steps.

use crate::config::{LoopParams, WorkflowParams};
use crate::ports::completion::{CompletionProvider, ImageAttachment};
use crate::ports::deployment::{DeploymentError, DeploymentTarget};
use crate::ports::doc_search::DocumentationSearch;
use crate::ports::evaluator::QualityEvaluator;
use crate::ports::pattern_store::PatternStore;
use crate::ports::progress::{NoProgress, WorkflowProgressNotifier, WorkflowStage};
use crate::ports::run_learner::RunLearner;
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::use_cases::execute_agent::{AgentError, ExecuteAgentInput, ExecuteAgentUseCase};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use swarm_domain::core::text::truncate;
use swarm_domain::{
    AgentContext, AgentOutput, AgentRole, DeploymentReceipt, DeploymentRequest, Documentation,
    DomainError, FileValidator, NoValidation, OutputValidator, Pattern, ResearchStage,
    WorkflowReport, needs_vision,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a workflow run
#[derive(Error, Debug)]
pub enum RunWorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(DomainError),

    #[error("{} agent failed: {source}", .role.as_str())]
    Agent {
        role: AgentRole,
        #[source]
        source: AgentError,
    },

    #[error("Deployment failed: {0}")]
    Deployment(#[from] DeploymentError),

    #[error("{0}")]
    NotDeployable(DomainError),
}

/// Input for the RunWorkflow use case
#[derive(Debug, Clone)]
pub struct RunWorkflowInput {
    pub task: String,
    /// Sketch or mockup for the vision agent
    pub image: Option<ImageAttachment>,
    pub params: WorkflowParams,
}

impl RunWorkflowInput {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            image: None,
            params: WorkflowParams::default(),
        }
    }

    pub fn with_image(mut self, image: Option<ImageAttachment>) -> Self {
        self.image = image;
        self
    }

    pub fn with_params(mut self, params: WorkflowParams) -> Self {
        self.params = params;
        self
    }
}

/// Use case for running the full agent workflow
pub struct RunWorkflowUseCase<P: CompletionProvider + 'static, E: QualityEvaluator + 'static> {
    agents: ExecuteAgentUseCase<P, E>,
    file_validator: FileValidator,
    pattern_store: Option<Arc<dyn PatternStore>>,
    doc_search: Option<Arc<dyn DocumentationSearch>>,
    deployer: Option<Arc<dyn DeploymentTarget>>,
    learner: Option<Arc<dyn RunLearner>>,
    logger: Arc<dyn RunLogger>,
}

impl<P: CompletionProvider + 'static, E: QualityEvaluator + 'static> RunWorkflowUseCase<P, E> {
    pub fn new(agents: ExecuteAgentUseCase<P, E>) -> Self {
        Self {
            agents,
            file_validator: FileValidator::new(),
            pattern_store: None,
            doc_search: None,
            deployer: None,
            learner: None,
            logger: Arc::new(NoRunLogger),
        }
    }

    pub fn with_pattern_store(mut self, store: Arc<dyn PatternStore>) -> Self {
        self.pattern_store = Some(store);
        self
    }

    pub fn with_doc_search(mut self, search: Arc<dyn DocumentationSearch>) -> Self {
        self.doc_search = Some(search);
        self
    }

    pub fn with_deployer(mut self, deployer: Arc<dyn DeploymentTarget>) -> Self {
        self.deployer = Some(deployer);
        self
    }

    pub fn with_learner(mut self, learner: Arc<dyn RunLearner>) -> Self {
        self.learner = Some(learner);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunWorkflowInput) -> Result<WorkflowReport, RunWorkflowError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunWorkflowInput,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Result<WorkflowReport, RunWorkflowError> {
        let started = Instant::now();
        let task = input.task.trim();
        if task.is_empty() {
            return Err(RunWorkflowError::InvalidInput(DomainError::InvalidTask(
                "task must not be empty".to_string(),
            )));
        }
        let params = &input.params;
        info!("Starting workflow: {}", truncate(task, 80));
        self.logger.log(RunEvent::new(
            "workflow_start",
            json!({ "task": task, "image": input.image.is_some() }),
        ));

        // Knowledge
        let patterns = self.retrieve_patterns(task, params, progress).await;
        let documentation = self.search_documentation(task, params, progress).await;
        let research = ResearchStage::new(task, patterns, documentation);
        info!("Task category: {}", research.category());

        // Vision (optional, non-fatal)
        let vision = if needs_vision(task, input.image.is_some()) {
            self.analyze_design(&research, input.image.as_ref(), params, progress)
                .await
        } else {
            debug!("Skipping vision analysis");
            None
        };
        let design = research.with_vision(vision);

        // Architecture
        progress.on_stage_start(WorkflowStage::Architecture);
        let architecture = self
            .run_agent(
                AgentRole::Architecture,
                task,
                design.architecture_context(),
                &NoValidation,
                params.agent,
                progress,
            )
            .await;
        progress.on_stage_complete(WorkflowStage::Architecture, architecture.is_ok());
        let architected = design.with_architecture(architecture?);

        // Implementation and security run concurrently
        progress.on_stage_start(WorkflowStage::ImplementationAndSecurity);
        let build = tokio::try_join!(
            self.run_agent(
                AgentRole::Implementation,
                task,
                architected.implementation_context(),
                &self.file_validator,
                params.agent,
                progress,
            ),
            self.run_agent(
                AgentRole::Security,
                task,
                architected.security_context(),
                &NoValidation,
                params.agent,
                progress,
            ),
        );
        progress.on_stage_complete(WorkflowStage::ImplementationAndSecurity, build.is_ok());
        let (implementation, security) = build?;
        let built = architected.with_build(implementation, security);

        // Testing
        progress.on_stage_start(WorkflowStage::Testing);
        let testing = self
            .run_agent(
                AgentRole::Testing,
                task,
                built.testing_context(),
                &NoValidation,
                params.agent,
                progress,
            )
            .await;
        progress.on_stage_complete(WorkflowStage::Testing, testing.is_ok());
        let tested = built.with_testing(testing?);

        // Aggregate
        progress.on_stage_start(WorkflowStage::Aggregation);
        let mut report = WorkflowReport::aggregate(
            tested,
            params.agent.quality_threshold,
            started.elapsed().as_millis() as u64,
        );
        progress.on_stage_complete(WorkflowStage::Aggregation, true);
        info!(
            "Average score {:.1}/100 (threshold {}, {})",
            report.avg_score,
            report.quality_threshold,
            if report.threshold_met { "met" } else { "not met" }
        );

        if report.threshold_met && params.store_patterns {
            report.pattern_id = self.store_pattern(&report).await;
        }
        self.learn(&report).await;

        if params.deploy {
            report.deployment = Some(self.deploy(&report, params, progress).await?);
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        self.logger.log(RunEvent::new(
            "workflow_complete",
            json!({
                "avg_score": report.avg_score,
                "threshold_met": report.threshold_met,
                "pattern_id": &report.pattern_id,
                "total_iterations": report.total_iterations(),
                "elapsed_ms": report.elapsed_ms,
            }),
        ));
        Ok(report)
    }

    async fn run_agent(
        &self,
        role: AgentRole,
        task: &str,
        context: AgentContext,
        validator: &dyn OutputValidator,
        params: LoopParams,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Result<AgentOutput, RunWorkflowError> {
        let input = ExecuteAgentInput::new(role, task, context)
            .with_validator(validator)
            .with_params(params);
        self.agents
            .execute_with_progress(input, progress)
            .await
            .map_err(|source| RunWorkflowError::Agent { role, source })
    }

    async fn retrieve_patterns(
        &self,
        task: &str,
        params: &WorkflowParams,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Vec<Pattern> {
        let Some(store) = &self.pattern_store else {
            debug!("No pattern store configured");
            return Vec::new();
        };
        progress.on_stage_start(WorkflowStage::PatternRetrieval);
        let result = store
            .retrieve_similar(task, params.rag_limit, params.agent.quality_threshold)
            .await;
        progress.on_stage_complete(WorkflowStage::PatternRetrieval, result.is_ok());
        match result {
            Ok(patterns) => {
                info!("Retrieved {} similar pattern(s)", patterns.len());
                patterns
            }
            Err(e) => {
                warn!("Pattern retrieval failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn search_documentation(
        &self,
        task: &str,
        params: &WorkflowParams,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Option<Documentation> {
        let search = self.doc_search.as_ref().filter(|_| params.search_docs)?;
        progress.on_stage_start(WorkflowStage::DocumentationSearch);
        let result = search.search(task).await;
        progress.on_stage_complete(WorkflowStage::DocumentationSearch, result.is_ok());
        match result {
            Ok(Some(docs)) => {
                info!("Found {} documentation result(s)", docs.results.len());
                Some(docs)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Documentation search failed: {}", e);
                None
            }
        }
    }

    async fn analyze_design(
        &self,
        research: &ResearchStage,
        image: Option<&ImageAttachment>,
        params: &WorkflowParams,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Option<AgentOutput> {
        progress.on_stage_start(WorkflowStage::VisionAnalysis);
        let input = ExecuteAgentInput::new(AgentRole::Vision, research.task(), research.vision_context())
            .with_params(params.vision_params())
            .with_image(image);
        let result = self.agents.execute_with_progress(input, progress).await;
        progress.on_stage_complete(WorkflowStage::VisionAnalysis, result.is_ok());
        match result {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("Vision analysis failed, continuing without it: {}", e);
                None
            }
        }
    }

    async fn store_pattern(&self, report: &WorkflowReport) -> Option<String> {
        let store = self.pattern_store.as_ref()?;
        match store
            .store_if_above_threshold(&report.task, &report.scored_outputs(), report.avg_score)
            .await
        {
            Ok(Some(id)) => {
                info!("Stored pattern {}", id);
                Some(id)
            }
            Ok(None) => {
                debug!("Pattern store declined the run");
                None
            }
            Err(e) => {
                warn!("Failed to store pattern: {}", e);
                None
            }
        }
    }

    /// Feed the run to the learner. Failures only cost the history entry.
    async fn learn(&self, report: &WorkflowReport) {
        let Some(learner) = &self.learner else {
            return;
        };
        match learner.learn_from_outcome(report).await {
            Ok(outcome) => {
                info!(
                    "Learned from run #{}{}",
                    outcome.total_runs,
                    if outcome.strategy_stored { " (strategy kept)" } else { "" }
                );
                self.logger.log(RunEvent::new(
                    "learned",
                    json!({
                        "total_runs": outcome.total_runs,
                        "strategy_stored": outcome.strategy_stored,
                    }),
                ));
            }
            Err(e) => warn!("Failed to record run outcome: {}", e),
        }
    }

    async fn deploy(
        &self,
        report: &WorkflowReport,
        params: &WorkflowParams,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Result<DeploymentReceipt, RunWorkflowError> {
        progress.on_stage_start(WorkflowStage::Deployment);
        let result = self.deploy_inner(report, params).await;
        progress.on_stage_complete(WorkflowStage::Deployment, result.is_ok());
        result
    }

    async fn deploy_inner(
        &self,
        report: &WorkflowReport,
        params: &WorkflowParams,
    ) -> Result<DeploymentReceipt, RunWorkflowError> {
        let name = params
            .project_name
            .clone()
            .unwrap_or_else(|| project_slug(&report.task));
        let request = DeploymentRequest::from_output(&report.implementation, name)
            .map_err(RunWorkflowError::NotDeployable)?;
        let deployer = self.deployer.as_ref().ok_or_else(|| {
            DeploymentError::Failed("no deployment target configured".to_string())
        })?;
        info!(
            "Deploying {} ({} file(s), {})",
            request.project_name,
            request.files.len(),
            request.archetype.as_str()
        );
        let receipt = deployer.deploy(&request).await?;
        info!("Deployed to {}", receipt.location);
        Ok(receipt)
    }
}

/// Directory-safe project name derived from the task.
fn project_slug(task: &str) -> String {
    let words: Vec<String> = task
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(5)
        .map(str::to_ascii_lowercase)
        .collect();
    if words.is_empty() {
        "codeswarm-project".to_string()
    } else {
        words.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::ports::completion::{Completion, CompletionRequest, ProviderError, Usage};
    use crate::ports::doc_search::DocSearchError;
    use crate::ports::evaluator::{EvaluationRequest, EvaluatorError};
    use crate::ports::pattern_store::PatternStoreError;
    use crate::ports::run_learner::{LearnerError, LearningOutcome};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use swarm_domain::{AgentPromptTemplate, DocResult, PerformanceSummary};

    const ROLES: [AgentRole; 5] = [
        AgentRole::Architecture,
        AgentRole::Implementation,
        AgentRole::Security,
        AgentRole::Testing,
        AgentRole::Vision,
    ];

    const SITE: &str = "// file: index.html\n```html\n<html><link href=\"style.css\"></html>\n```\n\
                        // file: style.css\n```css\nbody { margin: 0; }\n```\n\
                        Reasoning: a static page";

    /// Mock provider that answers by agent role, identified by system prompt
    struct RoleProvider {
        responses: HashMap<AgentRole, String>,
        requests: Mutex<Vec<(AgentRole, CompletionRequest)>>,
    }

    impl RoleProvider {
        fn new() -> Self {
            let mut responses = HashMap::new();
            responses.insert(
                AgentRole::Architecture,
                "```text\nARCH: static page with one stylesheet\n```\nReasoning: simple".to_string(),
            );
            responses.insert(AgentRole::Implementation, SITE.to_string());
            responses.insert(
                AgentRole::Security,
                "```text\nSEC: add a CSP header\n```\nReasoning: headers".to_string(),
            );
            responses.insert(
                AgentRole::Testing,
                "```js\nTEST: test('renders', () => {})\n```\nReasoning: smoke test".to_string(),
            );
            responses.insert(
                AgentRole::Vision,
                "```text\nVISION: hero section, two columns\n```\nReasoning: from sketch".to_string(),
            );
            Self {
                responses,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn respond(mut self, role: AgentRole, text: &str) -> Self {
            self.responses.insert(role, text.to_string());
            self
        }

        fn prompts_for(&self, role: AgentRole) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(r, _)| *r == role)
                .map(|(_, req)| req.messages[1].content.clone())
                .collect()
        }

        fn called(&self, role: AgentRole) -> bool {
            !self.prompts_for(role).is_empty()
        }
    }

    #[async_trait]
    impl CompletionProvider for RoleProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
            let role = ROLES
                .into_iter()
                .find(|r| AgentPromptTemplate::system(*r) == request.messages[0].content)
                .expect("known system prompt");
            self.requests.lock().unwrap().push((role, request.clone()));
            Ok(Completion {
                text: self.responses.get(&role).cloned().unwrap_or_default(),
                usage: Usage::default(),
                latency_ms: 5,
            })
        }
    }

    /// Mock evaluator that returns a fixed score per role
    struct FixedEvaluator {
        default: f64,
        per_role: HashMap<AgentRole, f64>,
    }

    impl FixedEvaluator {
        fn new(default: f64) -> Self {
            Self {
                default,
                per_role: HashMap::new(),
            }
        }

        fn with_score(mut self, role: AgentRole, score: f64) -> Self {
            self.per_role.insert(role, score);
            self
        }
    }

    #[async_trait]
    impl QualityEvaluator for FixedEvaluator {
        async fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
            Ok(*self.per_role.get(&request.role).unwrap_or(&self.default))
        }
    }

    /// In-memory pattern store that records stored runs
    #[derive(Default)]
    struct MemoryPatternStore {
        patterns: Vec<Pattern>,
        fail: bool,
        stored: Mutex<Vec<(String, usize, f64)>>,
    }

    #[async_trait]
    impl PatternStore for MemoryPatternStore {
        async fn retrieve_similar(
            &self,
            _task: &str,
            limit: usize,
            min_score: f64,
        ) -> Result<Vec<Pattern>, PatternStoreError> {
            if self.fail {
                return Err(PatternStoreError::Data("corrupt".to_string()));
            }
            Ok(self
                .patterns
                .iter()
                .filter(|p| p.avg_score >= min_score)
                .take(limit)
                .cloned()
                .collect())
        }

        async fn store_if_above_threshold(
            &self,
            task: &str,
            outputs: &[&AgentOutput],
            avg_score: f64,
        ) -> Result<Option<String>, PatternStoreError> {
            let mut stored = self.stored.lock().unwrap();
            stored.push((task.to_string(), outputs.len(), avg_score));
            Ok(Some(format!("pattern_{}", stored.len())))
        }
    }

    struct StaticDocs {
        fail: bool,
    }

    #[async_trait]
    impl DocumentationSearch for StaticDocs {
        async fn search(&self, task: &str) -> Result<Option<Documentation>, DocSearchError> {
            if self.fail {
                return Err(DocSearchError::RequestFailed("offline".to_string()));
            }
            Ok(Some(Documentation {
                query: format!("{task} documentation tutorial"),
                results: vec![DocResult {
                    title: "MDN: link".to_string(),
                    url: "https://developer.mozilla.org".to_string(),
                    content: "The link element".to_string(),
                }],
            }))
        }
    }

    /// Deployment target that records requests
    #[derive(Default)]
    struct RecordingDeployer {
        requests: Mutex<Vec<DeploymentRequest>>,
    }

    #[async_trait]
    impl DeploymentTarget for RecordingDeployer {
        async fn deploy(
            &self,
            request: &DeploymentRequest,
        ) -> Result<DeploymentReceipt, DeploymentError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(DeploymentReceipt {
                location: format!("/tmp/{}", request.project_name),
                files_written: request.files.len(),
                run_command: request.run_command.clone(),
                preview_url: None,
            })
        }
    }

    /// Learner that records the reports it was given
    #[derive(Default)]
    struct RecordingLearner {
        fail: bool,
        seen: Mutex<Vec<(f64, bool, Option<String>)>>,
    }

    #[async_trait]
    impl RunLearner for RecordingLearner {
        async fn learn_from_outcome(
            &self,
            report: &WorkflowReport,
        ) -> Result<LearningOutcome, LearnerError> {
            if self.fail {
                return Err(LearnerError::Data("corrupt".to_string()));
            }
            let mut seen = self.seen.lock().unwrap();
            seen.push((report.avg_score, report.threshold_met, report.pattern_id.clone()));
            Ok(LearningOutcome {
                total_runs: seen.len() as u64,
                strategy_stored: report.avg_score >= 90.0,
            })
        }

        async fn performance_summary(&self) -> Result<PerformanceSummary, LearnerError> {
            Err(LearnerError::Data("unused".to_string()))
        }
    }

    fn pattern(score: f64) -> Pattern {
        Pattern {
            id: format!("p{score}"),
            task: "static landing page".to_string(),
            avg_score: score,
            summary: "Single page with stylesheet".to_string(),
            code_snippet: String::new(),
        }
    }

    fn workflow(
        provider: &Arc<RoleProvider>,
        evaluator: FixedEvaluator,
    ) -> RunWorkflowUseCase<RoleProvider, FixedEvaluator> {
        let agents = ExecuteAgentUseCase::new(Arc::clone(provider), Arc::new(evaluator))
            .with_retry_policy(RetryPolicy::none().with_initial_delay(Duration::ZERO));
        RunWorkflowUseCase::new(agents)
    }

    #[tokio::test]
    async fn test_full_run_meets_threshold_and_stores_pattern() {
        let provider = Arc::new(RoleProvider::new());
        let store = Arc::new(MemoryPatternStore {
            patterns: vec![pattern(95.0), pattern(70.0)],
            ..MemoryPatternStore::default()
        });
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .with_pattern_store(store.clone())
            .with_doc_search(Arc::new(StaticDocs { fail: false }))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        assert!(report.threshold_met);
        assert_eq!(report.avg_score, 95.0);
        assert_eq!(report.rag_patterns_used, 1);
        assert_eq!(report.documentation_results, 1);
        assert!(report.vision.is_none());
        assert!(!provider.called(AgentRole::Vision));
        assert_eq!(report.pattern_id.as_deref(), Some("pattern_1"));
        assert!(report.deployment.is_none());

        let files = report.implementation.parsed_files().expect("validated files");
        assert!(files.contains("index.html"));
        assert!(files.contains("style.css"));

        let stored = store.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, "Build a landing page");
        assert_eq!(stored[0].1, 4);
    }

    #[tokio::test]
    async fn test_context_flows_between_stages() {
        let provider = Arc::new(RoleProvider::new());
        workflow(&provider, FixedEvaluator::new(95.0))
            .with_pattern_store(Arc::new(MemoryPatternStore {
                patterns: vec![pattern(96.0)],
                ..MemoryPatternStore::default()
            }))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        let architecture = &provider.prompts_for(AgentRole::Architecture)[0];
        assert!(architecture.contains("Single page with stylesheet"));

        let implementation = &provider.prompts_for(AgentRole::Implementation)[0];
        assert!(implementation.contains("ARCH: static page with one stylesheet"));

        let security = &provider.prompts_for(AgentRole::Security)[0];
        assert!(security.contains("ARCH: static page"));
        assert!(!security.contains("index.html"));

        let testing = &provider.prompts_for(AgentRole::Testing)[0];
        assert!(testing.contains("# File: index.html"));
        assert!(testing.contains("SEC: add a CSP header"));
    }

    #[tokio::test]
    async fn test_image_triggers_vision_analysis() {
        let provider = Arc::new(RoleProvider::new());
        let input = RunWorkflowInput::new("Build a landing page")
            .with_image(Some(ImageAttachment::new("image/png", "aGVsbG8=")));
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(input)
            .await
            .unwrap();

        let vision = report.vision.expect("vision output");
        assert!(vision.code().contains("VISION"));
        let architecture = &provider.prompts_for(AgentRole::Architecture)[0];
        assert!(architecture.contains("Vision Analysis (from sketch/mockup):\nVISION"));
        assert!(architecture.contains("hero section"));
    }

    #[tokio::test]
    async fn test_vision_failure_is_not_fatal() {
        let provider = Arc::new(RoleProvider::new().respond(AgentRole::Vision, "no code here"));
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("Turn my wireframe into a page"))
            .await
            .unwrap();

        assert!(provider.called(AgentRole::Vision));
        assert!(report.vision.is_none());
        assert!(report.threshold_met);
    }

    #[tokio::test]
    async fn test_agent_failure_aborts_run() {
        let provider = Arc::new(RoleProvider::new().respond(AgentRole::Testing, "I refuse."));
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await;

        match result {
            Err(RunWorkflowError::Agent {
                role: AgentRole::Testing,
                source: AgentError::ModelsExhausted { attempts, .. },
            }) => assert_eq!(attempts, 9),
            other => panic!("expected testing agent failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_implementation_stops_before_testing() {
        let provider = Arc::new(
            RoleProvider::new().respond(AgentRole::Implementation, "Here is the idea, no files yet."),
        );
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await;

        match result {
            Err(RunWorkflowError::Agent {
                role: AgentRole::Implementation,
                source: AgentError::ModelsExhausted { attempts, .. },
            }) => assert_eq!(attempts, 9),
            other => panic!("expected implementation agent failure, got {other:?}"),
        }
        assert!(!provider.called(AgentRole::Testing));
    }

    #[tokio::test]
    async fn test_empty_security_output_stops_before_testing() {
        let provider = Arc::new(RoleProvider::new().respond(AgentRole::Security, ""));
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await;

        assert!(matches!(
            result,
            Err(RunWorkflowError::Agent {
                role: AgentRole::Security,
                ..
            })
        ));
        assert!(!provider.called(AgentRole::Testing));
    }

    #[tokio::test]
    async fn test_below_threshold_is_reported_not_stored() {
        let provider = Arc::new(RoleProvider::new());
        let store = Arc::new(MemoryPatternStore::default());
        let evaluator = FixedEvaluator::new(95.0).with_score(AgentRole::Security, 60.0);
        let report = workflow(&provider, evaluator)
            .with_pattern_store(store.clone())
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        assert_eq!(report.security.quality_score(), Some(60.0));
        assert_eq!(report.avg_score, (95.0 * 3.0 + 60.0) / 4.0);
        assert!(!report.threshold_met);
        assert!(report.pattern_id.is_none());
        assert!(store.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_optional_step_failures_are_not_fatal() {
        let provider = Arc::new(RoleProvider::new());
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .with_pattern_store(Arc::new(MemoryPatternStore {
                fail: true,
                ..MemoryPatternStore::default()
            }))
            .with_doc_search(Arc::new(StaticDocs { fail: true }))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        assert_eq!(report.rag_patterns_used, 0);
        assert_eq!(report.documentation_results, 0);
        assert!(report.threshold_met);
    }

    #[tokio::test]
    async fn test_learner_sees_aggregated_report() {
        let provider = Arc::new(RoleProvider::new());
        let learner = Arc::new(RecordingLearner::default());
        let evaluator = FixedEvaluator::new(95.0).with_score(AgentRole::Testing, 75.0);
        workflow(&provider, evaluator)
            .with_pattern_store(Arc::new(MemoryPatternStore::default()))
            .with_learner(learner.clone())
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        let seen = learner.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, (95.0 * 3.0 + 75.0) / 4.0);
        assert!(seen[0].1);
        assert_eq!(seen[0].2.as_deref(), Some("pattern_1"));
    }

    #[tokio::test]
    async fn test_learner_failure_is_not_fatal() {
        let provider = Arc::new(RoleProvider::new());
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .with_learner(Arc::new(RecordingLearner {
                fail: true,
                ..RecordingLearner::default()
            }))
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await
            .unwrap();

        assert!(report.threshold_met);
    }

    #[tokio::test]
    async fn test_failed_run_is_not_learned() {
        let provider = Arc::new(RoleProvider::new().respond(AgentRole::Testing, "I refuse."));
        let learner = Arc::new(RecordingLearner::default());
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .with_learner(learner.clone())
            .execute(RunWorkflowInput::new("Build a landing page"))
            .await;

        assert!(result.is_err());
        assert!(learner.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_doc_search_can_be_disabled() {
        let provider = Arc::new(RoleProvider::new());
        let params = WorkflowParams::default().with_search_docs(false);
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .with_doc_search(Arc::new(StaticDocs { fail: false }))
            .execute(RunWorkflowInput::new("Build a landing page").with_params(params))
            .await
            .unwrap();

        assert_eq!(report.documentation_results, 0);
    }

    #[tokio::test]
    async fn test_deploys_validated_files() {
        let provider = Arc::new(RoleProvider::new());
        let deployer = Arc::new(RecordingDeployer::default());
        let params = WorkflowParams::default().with_deploy(true);
        let report = workflow(&provider, FixedEvaluator::new(95.0))
            .with_deployer(deployer.clone())
            .execute(RunWorkflowInput::new("Build a landing page!").with_params(params))
            .await
            .unwrap();

        let receipt = report.deployment.expect("deployment receipt");
        assert_eq!(receipt.location, "/tmp/build-a-landing-page");
        assert_eq!(receipt.files_written, 2);
        assert_eq!(
            receipt.run_command.as_deref(),
            Some("python3 -m http.server 3000")
        );
        assert_eq!(deployer.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deploy_without_target_fails() {
        let provider = Arc::new(RoleProvider::new());
        let params = WorkflowParams::default().with_deploy(true);
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("Build a landing page").with_params(params))
            .await;

        assert!(matches!(result, Err(RunWorkflowError::Deployment(_))));
    }

    #[tokio::test]
    async fn test_empty_task_is_rejected() {
        let provider = Arc::new(RoleProvider::new());
        let result = workflow(&provider, FixedEvaluator::new(95.0))
            .execute(RunWorkflowInput::new("   "))
            .await;

        assert!(matches!(result, Err(RunWorkflowError::InvalidInput(_))));
        assert!(!provider.called(AgentRole::Architecture));
    }

    #[test]
    fn test_project_slug() {
        assert_eq!(project_slug("Build a Todo app, please!"), "build-a-todo-app-please");
        assert_eq!(project_slug("???"), "codeswarm-project");
    }
}
