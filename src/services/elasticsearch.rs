use crate::core::shaper::BoundedQuery;
use crate::models::{EntityKind, StoredDocument};
use crate::services::backend::{BackendError, RawHit, SearchBackend, SearchHits};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Index names backing each entity kind
#[derive(Debug, Clone)]
pub struct IndexNames {
    pub jobs: String,
    pub candidates: String,
}

impl IndexNames {
    pub fn index_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Job => &self.jobs,
            EntityKind::Candidate => &self.candidates,
        }
    }
}

impl Default for IndexNames {
    fn default() -> Self {
        Self {
            jobs: EntityKind::Job.as_str().to_string(),
            candidates: EntityKind::Candidate.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: Option<String>,
}

/// Elasticsearch REST client
///
/// Handles all communication with the search engine:
/// - Point lookups of source entities
/// - Running match queries
/// - Cluster ping for health checks
pub struct ElasticsearchClient {
    base_url: String,
    auth: Option<BasicAuth>,
    client: Client,
    indices: IndexNames,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<HitEnvelope>,
}

/// Older engines report the total as a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, Deserialize)]
struct HitEnvelope {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
}

impl ElasticsearchClient {
    /// Create a new client
    pub fn new(base_url: String, indices: IndexNames, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            auth: None,
            client,
            indices,
        })
    }

    /// Authenticate every request with HTTP basic auth
    pub fn with_basic_auth(mut self, username: String, password: Option<String>) -> Self {
        self.auth = Some(BasicAuth { username, password });
        self
    }

    pub fn indices(&self) -> &IndexNames {
        &self.indices
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let builder = self.client.request(method, url);
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, auth.password.as_ref()),
            None => builder,
        }
    }

    /// Check that the cluster answers
    pub async fn ping(&self) -> Result<bool, BackendError> {
        let response = self.request(Method::GET, "").send().await?;
        Ok(response.status().is_success())
    }

    /// Fetch a document by id from the index of `kind`
    pub async fn get_document(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<StoredDocument>, BackendError> {
        let index = self.indices.index_for(kind);
        let path = format!("{}/_doc/{}", index, urlencoding::encode(id));

        tracing::debug!("Fetching {} document {}", index, id);

        let response = self.request(Method::GET, &path).send().await?;
        let status = response.status();

        if status != StatusCode::OK && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch {} document {}: {} - {}", index, id, status, body);
            return Err(BackendError::ApiError(format!(
                "Failed to fetch document: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        // A missing index also answers 404, but without the `found` flag
        if status == StatusCode::NOT_FOUND && json.get("found").is_none() {
            return Err(BackendError::ApiError(format!(
                "Index {} not available: {}",
                index,
                json.get("error").cloned().unwrap_or_default()
            )));
        }

        let doc: GetResponse = serde_json::from_value(json)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse document: {}", e)))?;

        if !doc.found {
            return Ok(None);
        }

        let source = doc
            .source
            .ok_or_else(|| BackendError::InvalidResponse("Missing _source".into()))?;

        Ok(Some(StoredDocument { id: doc.id, source }))
    }

    /// Run a bounded query against the index of `kind`
    pub async fn search(
        &self,
        kind: EntityKind,
        query: &BoundedQuery,
    ) -> Result<SearchHits, BackendError> {
        let index = self.indices.index_for(kind);
        let path = format!("{}/_search", index);

        let response = self
            .request(Method::POST, &path)
            .json(query)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body: Value = response.json().await.unwrap_or_default();
            let reason = rejection_reason(&body);
            tracing::warn!("Search on {} rejected: {}", index, reason);
            return Err(BackendError::Rejected {
                status: StatusCode::BAD_REQUEST.as_u16(),
                reason,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Search on {} failed: {} - {}", index, status, body);
            return Err(BackendError::ApiError(format!(
                "Failed to search {}: {}",
                index, status
            )));
        }

        let json: Value = response.json().await?;
        let parsed: SearchResponse = serde_json::from_value(json)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse hits: {}", e)))?;

        let hits: Vec<RawHit> = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| RawHit {
                id: hit.id,
                score: hit.score,
            })
            .collect();

        let total = match parsed.hits.total {
            Some(TotalHits::Count(value)) | Some(TotalHits::Object { value }) => value,
            None => hits.len() as u64,
        };

        tracing::debug!("Searched {}: {} hits (total: {})", index, hits.len(), total);

        Ok(SearchHits { hits, total })
    }
}

/// Most specific reason of an engine error body, root cause first
fn rejection_reason(body: &Value) -> String {
    let error = &body["error"];
    error["root_cause"][0]["reason"]
        .as_str()
        .or_else(|| error["reason"].as_str())
        .or_else(|| error.as_str())
        .unwrap_or("query rejected")
        .to_string()
}

impl SearchBackend for ElasticsearchClient {
    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<StoredDocument>, BackendError> {
        self.get_document(kind, id).await
    }

    async fn execute_query(
        &self,
        kind: EntityKind,
        query: &BoundedQuery,
    ) -> Result<SearchHits, BackendError> {
        self.search(kind, query).await
    }
}
