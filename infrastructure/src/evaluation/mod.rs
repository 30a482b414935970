//! Quality evaluator adapters.

mod heuristic;

pub use heuristic::HeuristicEvaluator;
