//! Learning adapters: the run outcome history.

mod json_learner;

pub use json_learner::{JsonRunLearner, MAX_STRATEGIES};
