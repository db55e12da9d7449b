use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::domain::{MatchedEntity, ResultPage, StoredDocument};

/// Response for the get entity endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEntityResponse {
    pub id: String,
    pub data: Value,
}

impl From<StoredDocument> for GetEntityResponse {
    fn from(doc: StoredDocument) -> Self {
        Self {
            id: doc.id,
            data: doc.source,
        }
    }
}

/// Response for the search matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatchesResponse {
    pub total_results: u64,
    pub results: Vec<MatchedEntity>,
}

impl From<ResultPage> for SearchMatchesResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            total_results: page.total_results,
            results: page.results,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
