//! Completion provider adapters.

mod openrouter;

pub use openrouter::OpenRouterProvider;
