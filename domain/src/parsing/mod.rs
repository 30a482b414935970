//! Parsing of raw model responses.
//!
//! - [`response`]: code/reasoning extraction
//! - [`markers`]: the multi-file marker protocol
//! - [`language`]: fence and language-tag handling

pub mod language;
pub mod markers;
pub mod response;

pub use markers::{CANONICAL_MARKER, FileSection, MarkerStyle, contains_markers, split_sections};
pub use response::{ParsedResponse, parse_response};
