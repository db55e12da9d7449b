use crate::models::EntityKind;
use crate::services::BackendError;
use thiserror::Error;

/// Errors surfaced by the matching operations
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid entity type: {0:?}")]
    InvalidEntityKind(String),

    #[error("No {kind} document with id {id}")]
    EntityNotFound { kind: EntityKind, id: String },

    /// The engine refused the query, e.g. an offset past its result window
    #[error("Search query rejected: {0}")]
    QueryRejected(String),

    #[error("Search backend unavailable: {0}")]
    BackingStoreUnavailable(#[from] BackendError),

    #[error("Stored {kind} document {id} is malformed: {source}")]
    MalformedEntity {
        kind: EntityKind,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl MatchError {
    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MatchError::InvalidEntityKind(_)
                | MatchError::EntityNotFound { .. }
                | MatchError::QueryRejected(_)
        )
    }
}
