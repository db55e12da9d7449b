use serde::Serialize;
use crate::core::query::QueryBody;
use crate::models::{MatchedEntity, ResultPage};
use crate::services::SearchHits;

/// Hard ceiling on the number of results returned in one page
pub const MAX_RESULT_SIZE: u64 = 200;

/// A query body with pagination applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundedQuery {
    #[serde(flatten)]
    pub body: QueryBody,
    pub from: u64,
    pub size: u64,
    /// Ask the engine for the exact total instead of a capped estimate
    pub track_total_hits: bool,
}

/// Applies pagination bounds and maps raw hits into result pages
#[derive(Debug, Clone, Copy)]
pub struct ResultShaper {
    max_result_size: u64,
}

impl ResultShaper {
    pub fn new(max_result_size: u64) -> Self {
        Self { max_result_size }
    }

    pub fn max_result_size(&self) -> u64 {
        self.max_result_size
    }

    /// Clamp a requested page size to the ceiling. Sizes are never raised.
    pub fn clamp_size(&self, requested: u64) -> u64 {
        requested.min(self.max_result_size)
    }

    /// Attach pagination to a query body.
    ///
    /// `from_index` is passed through unchecked; an offset past the end of
    /// the matching set yields an empty page.
    pub fn shape(&self, body: QueryBody, from_index: u64, requested_size: u64) -> BoundedQuery {
        let size = self.clamp_size(requested_size);
        if size < requested_size {
            tracing::debug!(requested_size, size, "Clamped requested page size");
        }

        BoundedQuery {
            body,
            from: from_index,
            size,
            track_total_hits: true,
        }
    }

    /// Map raw hits into a result page, keeping engine order.
    ///
    /// `total` stays the count of all matching documents, not the page length.
    pub fn map(&self, hits: SearchHits, bounded: &BoundedQuery) -> ResultPage {
        let page_len = usize::try_from(bounded.size).unwrap_or(usize::MAX);

        let results = hits
            .hits
            .into_iter()
            .take(page_len)
            .map(|hit| {
                let relevance_score = hit.score.unwrap_or_else(|| {
                    tracing::debug!(id = %hit.id, "Hit carries no score, ranking it at 0.0");
                    0.0
                });
                MatchedEntity {
                    id: hit.id,
                    relevance_score,
                }
            })
            .collect();

        ResultPage {
            total_results: hits.total,
            results,
        }
    }
}

impl Default for ResultShaper {
    fn default() -> Self {
        Self::new(MAX_RESULT_SIZE)
    }
}
