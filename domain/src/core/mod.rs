//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: models reachable through the completion provider
//! - [`error::DomainError`]: domain-level errors
//! - [`text`]: UTF-8 safe truncation and keyword extraction

pub mod error;
pub mod model;
pub mod text;
