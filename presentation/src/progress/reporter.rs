//! Progress reporting for workflow runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use swarm_application::{IterationOutcome, WorkflowProgressNotifier, WorkflowStage};
use swarm_domain::{AgentOutput, AgentRole, Model};

/// Short description of an iteration outcome
pub fn describe_outcome(outcome: IterationOutcome<'_>) -> String {
    match outcome {
        IterationOutcome::Scored(score) => format!("scored {:.1}", score),
        IterationOutcome::EmptyOutput => "empty output".to_string(),
        IterationOutcome::Invalid(failure) => format!("invalid ({})", failure.kind()),
        IterationOutcome::ProviderFailed(error) => format!("provider failed: {}", error),
    }
}

/// Reports progress during a workflow run with spinners
///
/// One spinner per stage; agents running inside a stage get their own
/// spinner so the parallel implementation and security agents stay apart.
pub struct ProgressReporter {
    multi: MultiProgress,
    stages: Mutex<HashMap<WorkflowStage, ProgressBar>>,
    agents: Mutex<HashMap<AgentRole, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stages: Mutex::new(HashMap::new()),
            agents: Mutex::new(HashMap::new()),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn agent_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.yellow} {prefix:.bold} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn spinner(&self, style: ProgressStyle, prefix: String) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(style);
        pb.set_prefix(prefix);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    fn with_agent_bar(&self, role: AgentRole, f: impl FnOnce(&ProgressBar)) {
        if let Ok(agents) = self.agents.lock()
            && let Some(pb) = agents.get(&role)
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: WorkflowStage) {
        let pb = self.spinner(Self::stage_style(), stage.display_name().to_string());
        pb.set_message("...");
        if let Ok(mut stages) = self.stages.lock() {
            stages.insert(stage, pb);
        }
    }

    fn on_stage_complete(&self, stage: WorkflowStage, success: bool) {
        let Some(pb) = self.stages.lock().ok().and_then(|mut s| s.remove(&stage)) else {
            return;
        };
        if success {
            pb.finish_with_message(format!("{}", "done".green()));
        } else {
            pb.finish_with_message(format!("{}", "failed".red()));
        }
    }

    fn on_agent_start(&self, role: AgentRole, model: &Model) {
        if let Ok(mut agents) = self.agents.lock() {
            let pb = agents
                .entry(role)
                .or_insert_with(|| self.spinner(Self::agent_style(), role.display_name().to_string()));
            pb.set_message(format!("{}", model.to_string().dimmed()));
        }
    }

    fn on_iteration(
        &self,
        role: AgentRole,
        model: &Model,
        iteration: u32,
        outcome: IterationOutcome<'_>,
    ) {
        self.with_agent_bar(role, |pb| {
            pb.set_message(format!(
                "{} #{}: {}",
                model.to_string().dimmed(),
                iteration,
                describe_outcome(outcome)
            ));
        });
    }

    fn on_fallback(&self, role: AgentRole, from: &Model, to: &Model) {
        self.with_agent_bar(role, |pb| {
            pb.set_message(format!("{} {} -> {}", "fallback".yellow(), from, to));
        });
    }

    fn on_agent_complete(&self, role: AgentRole, output: &AgentOutput) {
        let Some(pb) = self.agents.lock().ok().and_then(|mut a| a.remove(&role)) else {
            return;
        };
        let score = output
            .quality_score()
            .map_or_else(|| "-".to_string(), |s| format!("{:.1}", s));
        pb.finish_with_message(format!(
            "{} {} ({})",
            "v".green(),
            score,
            output.model_used()
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl WorkflowProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: WorkflowStage) {
        println!("{} {}", "->".cyan(), stage.display_name().bold());
    }

    fn on_stage_complete(&self, stage: WorkflowStage, success: bool) {
        if !success {
            println!("  {} {} failed", "x".red(), stage.display_name());
        }
    }

    fn on_iteration(
        &self,
        role: AgentRole,
        model: &Model,
        iteration: u32,
        outcome: IterationOutcome<'_>,
    ) {
        println!(
            "  {} {} #{}: {}",
            role.display_name(),
            model,
            iteration,
            describe_outcome(outcome)
        );
    }

    fn on_fallback(&self, role: AgentRole, from: &Model, to: &Model) {
        println!(
            "  {} {} switching {} -> {}",
            "!".yellow(),
            role.display_name(),
            from,
            to
        );
    }

    fn on_agent_complete(&self, role: AgentRole, output: &AgentOutput) {
        println!(
            "  {} {} done with {}",
            "v".green(),
            role.display_name(),
            output.model_used()
        );
    }
}
