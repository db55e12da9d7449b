use crate::core::{
    error::MatchError,
    query::synthesize,
    shaper::{BoundedQuery, ResultShaper},
    validator::validate_kind,
};
use crate::models::{EntityKind, EntityRecord, MatchCriteria, ResultPage, StoredDocument};
use crate::services::{BackendError, SearchBackend};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Entity kind validation
/// 2. Source entity lookup
/// 3. Query synthesis from the enabled criteria
/// 4. Pagination and result size capping
/// 5. Search against the opposite kind and hit mapping
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    shaper: ResultShaper,
}

impl Matcher {
    pub fn new(shaper: ResultShaper) -> Self {
        Self { shaper }
    }

    pub fn with_max_result_size(max_result_size: u64) -> Self {
        Self::new(ResultShaper::new(max_result_size))
    }

    pub fn shaper(&self) -> &ResultShaper {
        &self.shaper
    }

    /// Build the bounded search for a decoded source entity
    pub fn build_search(
        &self,
        record: &EntityRecord,
        criteria: &MatchCriteria,
        from_index: u64,
        size: u64,
    ) -> BoundedQuery {
        let body = synthesize(record, criteria).render();
        self.shaper.shape(body, from_index, size)
    }

    /// Fetch a stored entity by kind tag and identifier
    pub async fn get_entity<B: SearchBackend>(
        &self,
        backend: &B,
        kind: &str,
        id: &str,
    ) -> Result<StoredDocument, MatchError> {
        let kind = validate_kind(kind)?;
        lookup(backend, kind, id).await
    }

    /// Find entities of the opposite kind matching the identified entity
    ///
    /// # Arguments
    /// * `kind` - Kind tag of the source entity
    /// * `id` - Identifier of the source entity
    /// * `criteria` - Enabled match criteria and threshold
    /// * `from_index` - Offset into the matching set
    /// * `size` - Requested page size, capped at the configured ceiling
    pub async fn search_matches<B: SearchBackend>(
        &self,
        backend: &B,
        kind: &str,
        id: &str,
        criteria: &MatchCriteria,
        from_index: u64,
        size: u64,
    ) -> Result<ResultPage, MatchError> {
        let kind = validate_kind(kind)?;
        let doc = lookup(backend, kind, id).await?;

        let record = EntityRecord::from_source(kind, &doc.source).map_err(|source| {
            MatchError::MalformedEntity {
                kind,
                id: doc.id.clone(),
                source,
            }
        })?;

        let bounded = self.build_search(&record, criteria, from_index, size);
        let target = kind.opposite();
        let hits = backend
            .execute_query(target, &bounded)
            .await
            .map_err(|e| match e {
                BackendError::Rejected { reason, .. } => MatchError::QueryRejected(reason),
                other => MatchError::BackingStoreUnavailable(other),
            })?;
        let page = self.shaper.map(hits, &bounded);

        tracing::info!(
            source_kind = %kind,
            source_id = id,
            target_kind = %target,
            returned = page.results.len(),
            total = page.total_results,
            "Search matches completed"
        );

        Ok(page)
    }
}

async fn lookup<B: SearchBackend>(
    backend: &B,
    kind: EntityKind,
    id: &str,
) -> Result<StoredDocument, MatchError> {
    backend
        .fetch_by_id(kind, id)
        .await?
        .ok_or_else(|| MatchError::EntityNotFound {
            kind,
            id: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateRecord, JobRecord};
    use serde_json::json;

    #[test]
    fn test_build_search_for_job() {
        let matcher = Matcher::default();
        let record = EntityRecord::Job(JobRecord {
            salary_expectation: Some(5000.0),
            top_skills: Some(vec!["rust".to_string(), "go".to_string()]),
            seniority: Some("senior".to_string()),
        });

        let bounded = matcher.build_search(&record, &MatchCriteria::all(1), 0, 300);

        assert_eq!(bounded.size, 200);
        assert_eq!(bounded.from, 0);
        let should = bounded.body.query["bool"]["should"].as_array().unwrap();
        assert_eq!(should[0], json!({ "range": { "max_salary": { "lte": 5000.0 } } }));
        assert_eq!(should[2], json!({ "terms": { "seniorities": ["senior"] } }));
    }

    #[test]
    fn test_build_search_is_deterministic() {
        let matcher = Matcher::with_max_result_size(50);
        let record = EntityRecord::Candidate(CandidateRecord {
            max_salary: Some(4000.0),
            top_skills: Some(vec!["python".to_string()]),
            seniorities: Some(vec!["junior".to_string()]),
        });
        let criteria = MatchCriteria::all(2);

        let first = matcher.build_search(&record, &criteria, 10, 20);
        let second = matcher.build_search(&record, &criteria, 10, 20);

        assert_eq!(first, second);
        assert_eq!(matcher.shaper().max_result_size(), 50);
    }
}
