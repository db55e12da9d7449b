//! Talent Match - job/candidate matching over a search index
//!
//! Translates the attributes of a stored job (or candidate) into a weighted
//! query against the opposite index and returns ranked matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchError, ResultShaper, MAX_RESULT_SIZE, synthesize, validate_kind};
pub use crate::models::{EntityKind, EntityRecord, MatchCriteria, ResultPage, GetEntityRequest, SearchMatchesRequest};
pub use crate::services::{SearchBackend, ElasticsearchClient};
