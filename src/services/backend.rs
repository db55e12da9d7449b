use std::future::Future;
use thiserror::Error;
use crate::core::shaper::BoundedQuery;
use crate::models::{EntityKind, StoredDocument};

/// Errors that can occur when talking to the search backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    /// The engine refused the query itself (4xx), e.g. a page past the
    /// index's result window
    #[error("Query rejected with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// A raw search hit as ranked by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub id: String,
    pub score: Option<f64>,
}

/// Raw hits of one page plus the count of all matching documents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHits {
    pub hits: Vec<RawHit>,
    pub total: u64,
}

/// The search engine as seen by the matcher.
///
/// Both operations address the index named after the given entity kind.
/// Failures are returned as-is; retrying is left to the implementation.
pub trait SearchBackend: Send + Sync {
    /// Point lookup; `Ok(None)` when the document does not exist
    fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> impl Future<Output = Result<Option<StoredDocument>, BackendError>> + Send;

    /// Run a bounded query against the index of `kind`
    fn execute_query(
        &self,
        kind: EntityKind,
        query: &BoundedQuery,
    ) -> impl Future<Output = Result<SearchHits, BackendError>> + Send;
}
