//! Execute Agent use case
//!
//! Runs one agent through its quality loop: generate, parse, validate, score,
//! and either accept the output, retry with feedback, or fall back to the
//! next model in the sequence.

use crate::config::{LoopParams, RetryPolicy};
use crate::ports::completion::{
    ChatMessage, Completion, CompletionProvider, CompletionRequest, ImageAttachment, ProviderError,
};
use crate::ports::evaluator::{EvaluationRequest, QualityEvaluator};
use crate::ports::progress::{IterationOutcome, NoProgress, WorkflowProgressNotifier};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::use_cases::retry::retry_transient;
use serde_json::json;
use std::sync::Arc;
use swarm_domain::selection::fallback::next_in_sequence;
use swarm_domain::{
    AgentContext, AgentOutput, AgentPromptTemplate, AgentRole, ImprovementFeedback, Model,
    ModelRoster, NoValidation, OutputValidator, ValidationFailure, classify, fallback_rationale,
    parse_response, should_fallback,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end an agent execution
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(
        "{agent} produced no valid output with {} model(s) over {attempts} iteration(s)",
        .models_tried.len()
    )]
    ModelsExhausted {
        agent: String,
        models_tried: Vec<Model>,
        attempts: u32,
    },

    #[error("{agent} has no models configured")]
    NoModels { agent: String },
}

/// Why a single iteration produced nothing to score
#[derive(Debug)]
enum AttemptFailure {
    EmptyOutput,
    Invalid(ValidationFailure),
    Provider(ProviderError),
}

/// Input for the ExecuteAgent use case
pub struct ExecuteAgentInput<'a> {
    pub role: AgentRole,
    pub task: &'a str,
    /// Results of earlier stages visible to this agent
    pub context: AgentContext,
    /// Check applied to parsed code before scoring
    pub validator: &'a dyn OutputValidator,
    pub params: LoopParams,
    /// Image attached to the user message
    pub image: Option<&'a ImageAttachment>,
}

impl<'a> ExecuteAgentInput<'a> {
    pub fn new(role: AgentRole, task: &'a str, context: AgentContext) -> Self {
        Self {
            role,
            task,
            context,
            validator: &NoValidation,
            params: LoopParams::default(),
            image: None,
        }
    }

    pub fn with_validator(mut self, validator: &'a dyn OutputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_params(mut self, params: LoopParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_image(mut self, image: Option<&'a ImageAttachment>) -> Self {
        self.image = image;
        self
    }
}

/// Use case for running one agent's quality loop
pub struct ExecuteAgentUseCase<P: CompletionProvider + 'static, E: QualityEvaluator + 'static> {
    provider: Arc<P>,
    evaluator: Arc<E>,
    roster: ModelRoster,
    retry: RetryPolicy,
    logger: Arc<dyn RunLogger>,
}

impl<P: CompletionProvider + 'static, E: QualityEvaluator + 'static> ExecuteAgentUseCase<P, E> {
    pub fn new(provider: Arc<P>, evaluator: Arc<E>) -> Self {
        Self {
            provider,
            evaluator,
            roster: ModelRoster::default(),
            retry: RetryPolicy::default(),
            logger: Arc::new(NoRunLogger),
        }
    }

    pub fn with_roster(mut self, roster: ModelRoster) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: ExecuteAgentInput<'_>) -> Result<AgentOutput, AgentError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    ///
    /// Returns the first output that reaches the quality threshold. When no
    /// output does, returns the highest-scoring output across all models
    /// (earliest wins on ties). Fails only when no model produced a single
    /// valid, scored output.
    pub async fn execute_with_progress(
        &self,
        input: ExecuteAgentInput<'_>,
        progress: &dyn WorkflowProgressNotifier,
    ) -> Result<AgentOutput, AgentError> {
        let role = input.role;
        let category = classify(input.task);
        let models = self.roster.sequence_for(role, category);
        let threshold = input.params.quality_threshold;
        let max_iterations = input.params.max_iterations.max(1);

        info!(
            "{} starting ({} task, models: {})",
            role.display_name(),
            category,
            models.iter().map(Model::as_str).collect::<Vec<_>>().join(", ")
        );

        let mut best: Option<AgentOutput> = None;
        let mut iterations_used = 0u32;
        let mut models_tried = Vec::with_capacity(models.len());
        let mut current = models.first().cloned();

        while let Some(model) = current {
            progress.on_agent_start(role, &model);
            models_tried.push(model.clone());
            let mut last_failure: Option<ValidationFailure> = None;
            let mut model_scores: Vec<f64> = Vec::new();

            for iteration in 1..=max_iterations {
                debug!(
                    "{} iteration {}/{} on {}",
                    role.display_name(),
                    iteration,
                    max_iterations,
                    model
                );
                let prompt = Self::build_prompt(
                    &input,
                    iteration,
                    best.as_ref(),
                    last_failure.as_ref(),
                );

                let result = self.attempt(&input, &model, iteration, prompt).await;
                // Only attempts that got a completion back count.
                if !matches!(result, Err(AttemptFailure::Provider(_))) {
                    iterations_used += 1;
                }

                match result {
                    Ok(output) => {
                        last_failure = None;
                        let score = output.score_or_zero();
                        progress.on_iteration(
                            role,
                            &model,
                            iteration,
                            IterationOutcome::Scored(score),
                        );

                        if score >= threshold {
                            info!(
                                "{} reached threshold on {} ({:.1} >= {})",
                                role.display_name(),
                                model,
                                score,
                                threshold
                            );
                            return Ok(self.finish(output, iterations_used, progress));
                        }

                        model_scores.push(score);
                        if best.as_ref().is_none_or(|b| score > b.score_or_zero()) {
                            best = Some(output);
                        }

                        if let [.., previous, latest] = model_scores.as_slice() {
                            let improvement = latest - previous;
                            let best_score = best.as_ref().map_or(0.0, AgentOutput::score_or_zero);
                            if iteration < max_iterations
                                && should_fallback(
                                    model_scores.len() as u32,
                                    max_iterations,
                                    best_score,
                                    threshold,
                                    improvement,
                                )
                            {
                                info!(
                                    "{} leaving {} early (score change {:+.1})",
                                    role.display_name(),
                                    model,
                                    improvement
                                );
                                break;
                            }
                        }
                    }
                    Err(AttemptFailure::EmptyOutput) => {
                        warn!(
                            "{} got no code from {} (iteration {})",
                            role.display_name(),
                            model,
                            iteration
                        );
                        progress.on_iteration(role, &model, iteration, IterationOutcome::EmptyOutput);
                    }
                    Err(AttemptFailure::Invalid(failure)) => {
                        warn!(
                            "{} output from {} failed validation: {}",
                            role.display_name(),
                            model,
                            failure
                        );
                        self.logger.log(RunEvent::new(
                            "validation_failed",
                            json!({
                                "agent": role.as_str(),
                                "model": model.as_str(),
                                "iteration": iteration,
                                "failure": &failure,
                            }),
                        ));
                        progress.on_iteration(
                            role,
                            &model,
                            iteration,
                            IterationOutcome::Invalid(&failure),
                        );
                        last_failure = Some(failure);
                    }
                    Err(AttemptFailure::Provider(error)) => {
                        warn!(
                            "{} abandoning {} after provider error: {}",
                            role.display_name(),
                            model,
                            error
                        );
                        progress.on_iteration(
                            role,
                            &model,
                            iteration,
                            IterationOutcome::ProviderFailed(&error),
                        );
                        break;
                    }
                }
            }

            current = next_in_sequence(&models, &model);
            if let Some(next) = &current {
                let best_score = best.as_ref().map_or(0.0, AgentOutput::score_or_zero);
                info!(
                    "{}",
                    fallback_rationale(&model, next, category, best_score, threshold)
                );
                self.logger.log(RunEvent::new(
                    "fallback",
                    json!({
                        "agent": role.as_str(),
                        "from": model.as_str(),
                        "to": next.as_str(),
                        "best_score": best_score,
                    }),
                ));
                progress.on_fallback(role, &model, next);
            }
        }

        match best {
            Some(output) => {
                warn!(
                    "{} below threshold after {} model(s); returning best ({:.1} < {})",
                    role.display_name(),
                    models_tried.len(),
                    output.score_or_zero(),
                    threshold
                );
                Ok(self.finish(output, iterations_used, progress))
            }
            None if models_tried.is_empty() => Err(AgentError::NoModels {
                agent: role.display_name().to_string(),
            }),
            None => Err(AgentError::ModelsExhausted {
                agent: role.display_name().to_string(),
                models_tried,
                attempts: iterations_used,
            }),
        }
    }

    fn build_prompt(
        input: &ExecuteAgentInput<'_>,
        iteration: u32,
        best: Option<&AgentOutput>,
        last_failure: Option<&ValidationFailure>,
    ) -> String {
        if iteration > 1 {
            let feedback = ImprovementFeedback {
                previous_code: best.map(AgentOutput::code),
                previous_score: best.and_then(AgentOutput::quality_score),
                threshold: input.params.quality_threshold,
                validation: last_failure,
            };
            if feedback.has_feedback() {
                return AgentPromptTemplate::improvement(
                    input.role,
                    input.task,
                    &input.context,
                    &feedback,
                );
            }
        }
        AgentPromptTemplate::user(input.role, input.task, &input.context)
    }

    /// One generate/parse/validate/score round
    async fn attempt(
        &self,
        input: &ExecuteAgentInput<'_>,
        model: &Model,
        iteration: u32,
        prompt: String,
    ) -> Result<AgentOutput, AttemptFailure> {
        let role = input.role;
        let request = CompletionRequest {
            model: model.clone(),
            messages: vec![
                ChatMessage::system(AgentPromptTemplate::system(role)),
                ChatMessage::user(prompt).with_image(input.image.cloned()),
            ],
            temperature: role.temperature(),
            max_tokens: role.max_tokens(),
        };

        let completion = retry_transient(&self.retry, || self.provider.complete(&request))
            .await
            .map_err(AttemptFailure::Provider)?;
        self.logger.log(RunEvent::new(
            "completion",
            json!({
                "agent": role.as_str(),
                "model": model.as_str(),
                "iteration": iteration,
                "latency_ms": completion.latency_ms,
                "prompt_tokens": completion.usage.prompt_tokens,
                "completion_tokens": completion.usage.completion_tokens,
                "text": &completion.text,
            }),
        ));

        let parsed = parse_response(&completion.text);
        if parsed.code.trim().is_empty() {
            return Err(AttemptFailure::EmptyOutput);
        }
        let files = input
            .validator
            .validate(&parsed.code)
            .map_err(AttemptFailure::Invalid)?;

        let score = self
            .score(input, model, &parsed.code, &completion)
            .await;

        Ok(AgentOutput::builder(role, model.clone())
            .code(parsed.code)
            .reasoning(parsed.reasoning)
            .latency_ms(completion.latency_ms)
            .quality_score(score)
            .parsed_files(files)
            .build())
    }

    /// Score an output; evaluator failures yield the configured default.
    async fn score(
        &self,
        input: &ExecuteAgentInput<'_>,
        model: &Model,
        code: &str,
        completion: &Completion,
    ) -> f64 {
        let request = EvaluationRequest {
            task: input.task.to_string(),
            output: code.to_string(),
            role: input.role,
            model: model.clone(),
            input_tokens: completion.usage.prompt_tokens,
            output_tokens: completion.usage.completion_tokens,
            latency_ms: completion.latency_ms,
        };
        let default_score = input.params.default_score;
        let score = match self.evaluator.evaluate(&request).await {
            Ok(score) if score.is_finite() => score.clamp(0.0, 100.0),
            Ok(score) => {
                warn!("Evaluator returned {}; using default score {:.1}", score, default_score);
                default_score
            }
            Err(e) => {
                warn!("Evaluation failed: {}; using default score {:.1}", e, default_score);
                default_score
            }
        };
        self.logger.log(RunEvent::new(
            "score",
            json!({
                "agent": input.role.as_str(),
                "model": model.as_str(),
                "score": score,
            }),
        ));
        score
    }

    fn finish(
        &self,
        output: AgentOutput,
        iterations_used: u32,
        progress: &dyn WorkflowProgressNotifier,
    ) -> AgentOutput {
        let output = output.with_iterations_used(iterations_used);
        self.logger.log(RunEvent::new(
            "agent_complete",
            json!({
                "agent": output.role().as_str(),
                "model": output.model_used().as_str(),
                "score": output.quality_score(),
                "iterations": iterations_used,
                "files": output.parsed_files().map(|f| f.len()),
            }),
        ));
        progress.on_agent_complete(output.role(), &output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion::Usage;
    use crate::ports::evaluator::EvaluatorError;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;
    use swarm_domain::{FileValidator, TaskCategory};

    const TASK: &str = "Write a haiku generator";

    /// Mock provider that returns scripted responses per model
    struct ScriptedProvider {
        scripts: Mutex<HashMap<String, VecDeque<Result<String, ProviderError>>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn script(self, model: Model, responses: Vec<Result<String, ProviderError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(model.to_string(), responses.into());
            self
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn prompts(&self) -> Vec<String> {
            self.requests()
                .iter()
                .map(|r| r.messages[1].content.clone())
                .collect()
        }

        fn models_called(&self) -> Vec<Model> {
            self.requests().into_iter().map(|r| r.model).collect()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(request.model.as_str())
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| Ok("(no more responses)".to_string()));
            next.map(|text| Completion {
                text,
                usage: Usage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                },
                latency_ms: 10,
            })
        }
    }

    /// Mock evaluator that returns scripted scores in order
    struct ScriptedEvaluator {
        scores: Mutex<VecDeque<Result<f64, EvaluatorError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedEvaluator {
        fn new(scores: Vec<Result<f64, EvaluatorError>>) -> Self {
            Self {
                scores: Mutex::new(scores.into()),
                calls: Mutex::new(0),
            }
        }

        fn scores(scores: &[f64]) -> Self {
            Self::new(scores.iter().copied().map(Ok).collect())
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl QualityEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, _request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
            *self.calls.lock().unwrap() += 1;
            self.scores.lock().unwrap().pop_front().unwrap_or(Ok(50.0))
        }
    }

    /// Progress notifier that records fallbacks and iteration outcomes
    #[derive(Default)]
    struct TrackingProgress {
        fallbacks: Mutex<Vec<(Model, Model)>>,
        outcomes: Mutex<Vec<String>>,
    }

    impl WorkflowProgressNotifier for TrackingProgress {
        fn on_stage_start(&self, _stage: crate::ports::progress::WorkflowStage) {}
        fn on_stage_complete(&self, _stage: crate::ports::progress::WorkflowStage, _ok: bool) {}

        fn on_iteration(
            &self,
            _role: AgentRole,
            model: &Model,
            iteration: u32,
            outcome: IterationOutcome<'_>,
        ) {
            let label = match outcome {
                IterationOutcome::Scored(score) => format!("scored {score}"),
                IterationOutcome::EmptyOutput => "empty".to_string(),
                IterationOutcome::Invalid(failure) => format!("invalid {}", failure.kind()),
                IterationOutcome::ProviderFailed(_) => "provider".to_string(),
            };
            self.outcomes
                .lock()
                .unwrap()
                .push(format!("{model}#{iteration} {label}"));
        }

        fn on_fallback(&self, _role: AgentRole, from: &Model, to: &Model) {
            self.fallbacks
                .lock()
                .unwrap()
                .push((from.clone(), to.clone()));
        }
    }

    fn code(body: &str) -> Result<String, ProviderError> {
        Ok(format!("```js\n{body}\n```\nReasoning: {body} explained"))
    }

    fn use_case(
        provider: &Arc<ScriptedProvider>,
        evaluator: &Arc<ScriptedEvaluator>,
        models: Vec<Model>,
    ) -> ExecuteAgentUseCase<ScriptedProvider, ScriptedEvaluator> {
        ExecuteAgentUseCase::new(Arc::clone(provider), Arc::clone(evaluator))
            .with_roster(ModelRoster::new().with_override(TaskCategory::General, models))
            .with_retry_policy(
                RetryPolicy::default()
                    .with_initial_delay(Duration::ZERO)
                    .with_max_delay(Duration::ZERO),
            )
    }

    fn two_models() -> Vec<Model> {
        vec![Model::Gpt4o, Model::Grok4]
    }

    #[tokio::test]
    async fn test_returns_first_output_meeting_threshold() {
        let provider = Arc::new(ScriptedProvider::new().script(Model::Gpt4o, vec![code("a1")]));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[93.0]));
        let output = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert_eq!(output.code(), "a1");
        assert_eq!(output.reasoning(), "a1 explained");
        assert_eq!(output.quality_score(), Some(93.0));
        assert_eq!(output.model_used(), &Model::Gpt4o);
        assert_eq!(output.iterations_used(), 1);
        assert_eq!(output.latency_ms(), 10);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_plateau_falls_back_to_next_model() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .script(Model::Gpt4o, vec![code("a1"), code("a2"), code("a3")])
                .script(Model::Grok4, vec![code("b1")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[70.0, 72.0, 71.0, 95.0]));
        let progress = TrackingProgress::default();
        let output = use_case(&provider, &evaluator, two_models())
            .execute_with_progress(
                ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()),
                &progress,
            )
            .await
            .unwrap();

        assert_eq!(output.model_used(), &Model::Grok4);
        assert_eq!(output.code(), "b1");
        assert_eq!(output.iterations_used(), 4);
        assert_eq!(
            provider.models_called(),
            vec![Model::Gpt4o, Model::Gpt4o, Model::Gpt4o, Model::Grok4]
        );
        assert_eq!(
            *progress.fallbacks.lock().unwrap(),
            vec![(Model::Gpt4o, Model::Grok4)]
        );
    }

    #[tokio::test]
    async fn test_regression_falls_back_early() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .script(Model::Gpt4o, vec![code("a1"), code("a2"), code("a3")])
                .script(Model::Grok4, vec![code("b1")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[80.0, 75.0, 95.0]));
        let output = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Security, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert_eq!(output.model_used(), &Model::Grok4);
        assert_eq!(output.iterations_used(), 3);
        assert_eq!(
            provider.models_called(),
            vec![Model::Gpt4o, Model::Gpt4o, Model::Grok4]
        );
    }

    #[tokio::test]
    async fn test_empty_code_exhausts_models() {
        let provider = Arc::new(ScriptedProvider::new().script(
            Model::Gpt4o,
            vec![
                Ok("I cannot help with that.".to_string()),
                Ok("Still no code.".to_string()),
                Ok("```\n\n```".to_string()),
            ],
        ));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[]));
        let result = use_case(&provider, &evaluator, vec![Model::Gpt4o])
            .execute(ExecuteAgentInput::new(AgentRole::Testing, TASK, AgentContext::empty()))
            .await;

        match result {
            Err(AgentError::ModelsExhausted {
                agent,
                models_tried,
                attempts,
            }) => {
                assert_eq!(agent, "Testing Agent");
                assert_eq!(models_tried, vec![Model::Gpt4o]);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected ModelsExhausted, got {other:?}"),
        }
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn test_returns_best_output_below_threshold() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .script(Model::Gpt4o, vec![code("a1"), code("a2"), code("a3")])
                .script(Model::Grok4, vec![code("b1"), code("b2"), code("b3")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[60.0, 75.0, 76.0, 70.0, 65.0]));
        let output = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert_eq!(output.code(), "a3");
        assert_eq!(output.quality_score(), Some(76.0));
        assert_eq!(output.model_used(), &Model::Gpt4o);
        assert_eq!(output.iterations_used(), 5);
    }

    #[tokio::test]
    async fn test_ties_keep_earliest_output() {
        let provider = Arc::new(
            ScriptedProvider::new().script(Model::Gpt4o, vec![code("a1"), code("a2"), code("a3")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[80.0, 80.0]));
        let output = use_case(&provider, &evaluator, vec![Model::Gpt4o])
            .execute(ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert_eq!(output.code(), "a1");
        assert_eq!(output.iterations_used(), 2);
    }

    #[tokio::test]
    async fn test_validation_failure_is_fed_back_without_scoring() {
        let provider = Arc::new(ScriptedProvider::new().script(
            Model::Gpt4o,
            vec![
                Ok("// file: a.js\nimport './missing'\n".to_string()),
                Ok("// file: a.js\nconsole.log('x')\n// file: b.js\nimport './a'\n".to_string()),
            ],
        ));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[94.0]));
        let progress = TrackingProgress::default();
        let validator = FileValidator::new();
        let output = use_case(&provider, &evaluator, two_models())
            .execute_with_progress(
                ExecuteAgentInput::new(AgentRole::Implementation, TASK, AgentContext::empty())
                    .with_validator(&validator),
                &progress,
            )
            .await
            .unwrap();

        let files = output.parsed_files().expect("validated files");
        assert!(files.contains("a.js"));
        assert!(files.contains("b.js"));
        assert_eq!(evaluator.calls(), 1);
        assert_eq!(output.iterations_used(), 2);

        let prompts = provider.prompts();
        assert!(!prompts[0].contains("FAILED VALIDATION"));
        assert!(prompts[1].contains("FAILED VALIDATION"));
        assert!(prompts[1].contains("./missing"));
        assert_eq!(
            *progress.outcomes.lock().unwrap(),
            vec![
                "gpt-4o#1 invalid missing_file_references".to_string(),
                "gpt-4o#2 scored 94".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_outputs_without_validation_carry_no_files() {
        let provider = Arc::new(ScriptedProvider::new().script(
            Model::Gpt4o,
            vec![Ok("// file: a.js\nconsole.log('x')\n".to_string())],
        ));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[95.0]));
        let output = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Security, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert!(output.parsed_files().is_none());
        assert!(output.code().starts_with("# File: a.js"));
    }

    #[tokio::test]
    async fn test_evaluator_failure_uses_default_score() {
        let provider = Arc::new(ScriptedProvider::new().script(Model::Gpt4o, vec![code("a1")]));
        let evaluator = Arc::new(ScriptedEvaluator::new(vec![Err(
            EvaluatorError::Unavailable("down".into()),
        )]));
        let params = LoopParams::default().with_quality_threshold(85.0);
        let output = use_case(&provider, &evaluator, two_models())
            .execute(
                ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty())
                    .with_params(params),
            )
            .await
            .unwrap();

        assert_eq!(output.quality_score(), Some(85.0));
        assert_eq!(output.iterations_used(), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_do_not_consume_iterations() {
        let provider = Arc::new(ScriptedProvider::new().script(
            Model::Gpt4o,
            vec![Err(ProviderError::Server { status: 503 }), code("a1")],
        ));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[95.0]));
        let output = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()))
            .await
            .unwrap();

        assert_eq!(output.iterations_used(), 1);
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fatal_provider_error_abandons_model() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .script(
                    Model::Gpt4o,
                    vec![Err(ProviderError::ModelNotAvailable("gpt-4o".into()))],
                )
                .script(Model::Grok4, vec![code("b1")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[91.0]));
        let progress = TrackingProgress::default();
        let output = use_case(&provider, &evaluator, two_models())
            .execute_with_progress(
                ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()),
                &progress,
            )
            .await
            .unwrap();

        assert_eq!(output.model_used(), &Model::Grok4);
        assert_eq!(output.iterations_used(), 1);
        assert_eq!(provider.models_called(), vec![Model::Gpt4o, Model::Grok4]);
        assert_eq!(
            progress.outcomes.lock().unwrap()[0],
            "gpt-4o#1 provider".to_string()
        );
    }

    #[tokio::test]
    async fn test_abandoned_models_report_no_attempts() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .script(Model::Gpt4o, vec![Err(ProviderError::Api {
                    status: 401,
                    message: "bad key".into(),
                })])
                .script(
                    Model::Grok4,
                    vec![Err(ProviderError::ModelNotAvailable("grok-4".into()))],
                ),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[]));
        let result = use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Security, TASK, AgentContext::empty()))
            .await;

        match result {
            Err(AgentError::ModelsExhausted {
                models_tried,
                attempts,
                ..
            }) => {
                assert_eq!(models_tried, two_models());
                assert_eq!(attempts, 0);
            }
            other => panic!("expected ModelsExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_improvement_prompt_quotes_previous_best() {
        let provider = Arc::new(
            ScriptedProvider::new().script(Model::Gpt4o, vec![code("first draft"), code("a2")]),
        );
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[70.0, 95.0]));
        use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Architecture, TASK, AgentContext::empty()))
            .await
            .unwrap();

        let prompts = provider.prompts();
        assert!(!prompts[0].contains("Improvement Required"));
        assert!(prompts[1].contains("PREVIOUS BEST ATTEMPT (Score: 70.0/100)"));
        assert!(prompts[1].contains("first draft"));
    }

    #[tokio::test]
    async fn test_role_sampling_parameters_are_sent() {
        let provider = Arc::new(ScriptedProvider::new().script(Model::Gpt4o, vec![code("a1")]));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[95.0]));
        use_case(&provider, &evaluator, two_models())
            .execute(ExecuteAgentInput::new(AgentRole::Security, TASK, AgentContext::empty()))
            .await
            .unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.temperature, AgentRole::Security.temperature());
        assert_eq!(request.max_tokens, AgentRole::Security.max_tokens());
        assert_eq!(
            request.messages[0].content,
            AgentPromptTemplate::system(AgentRole::Security)
        );
    }

    #[tokio::test]
    async fn test_vision_uses_vision_models_and_image() {
        let provider = Arc::new(ScriptedProvider::new().script(Model::Gpt5, vec![code("layout")]));
        let evaluator = Arc::new(ScriptedEvaluator::scores(&[92.0]));
        let image = ImageAttachment::new("image/png", "aGVsbG8=");
        let output = use_case(&provider, &evaluator, two_models())
            .execute(
                ExecuteAgentInput::new(AgentRole::Vision, TASK, AgentContext::empty())
                    .with_image(Some(&image)),
            )
            .await
            .unwrap();

        assert_eq!(output.model_used(), &Model::Gpt5);
        assert_eq!(provider.requests()[0].messages[1].image, Some(image));
    }
}
