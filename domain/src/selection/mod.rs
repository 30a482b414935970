//! Model selection: task classification, model profiles and fallback rules.

pub mod category;
pub mod fallback;
pub mod profile;
pub mod vision;

pub use category::{TaskCategory, classify};
pub use fallback::{
    MAX_MODELS_PER_AGENT, ModelRoster, fallback_rationale, model_sequence, next_in_sequence,
    next_model, should_fallback, vision_sequence,
};
pub use profile::{ModelProfile, ReasoningTier, Speed};
pub use vision::needs_vision;
