//! Knowledge adapters: stored patterns and documentation search.

mod pattern_store;
mod tavily;

pub use pattern_store::{DEFAULT_STORE_THRESHOLD, JsonPatternStore};
pub use tavily::{TavilySearch, documentation_query};
