use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::MatchCriteria;

/// Request to fetch a stored entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEntityRequest {
    pub entity: String,
    pub id: u64,
}

/// Request to search matches for a stored entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchMatchesRequest {
    pub entity: String,
    pub id: u64,
    #[serde(default)]
    pub filters: MatchCriteria,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub from_index: i64,
    /// Page size; the configured default applies when omitted
    #[validate(range(min = 0))]
    #[serde(default)]
    pub size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_defaults() {
        let req: SearchMatchesRequest =
            serde_json::from_value(json!({ "entity": "jobs", "id": 7 })).unwrap();

        assert_eq!(req.from_index, 0);
        assert_eq!(req.size, None);
        assert_eq!(req.filters, MatchCriteria::default());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_negative_size_fails_validation() {
        let req: SearchMatchesRequest = serde_json::from_value(json!({
            "entity": "jobs",
            "id": 7,
            "from_index": 0,
            "size": -5
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }
}
