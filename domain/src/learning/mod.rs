//! Learning from finished runs: per-agent performance history and the
//! strategies of high-scoring runs.

pub mod performance;
pub mod strategy;

pub use performance::{AgentPerformance, AgentStats, PerformanceLog, PerformanceSummary};
pub use strategy::{STRATEGY_THRESHOLD, Strategy, agent_agreement};
