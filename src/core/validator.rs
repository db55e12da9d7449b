use crate::core::error::MatchError;
use crate::models::EntityKind;
use std::str::FromStr;

/// Check that `kind` is one of the supported entity tags.
///
/// Matching is exact and case-sensitive: `"jobs"` and `"candidates"` only.
pub fn validate_kind(kind: &str) -> Result<EntityKind, MatchError> {
    match EntityKind::ALL.into_iter().find(|k| k.as_str() == kind) {
        Some(kind) => Ok(kind),
        None => {
            tracing::debug!(kind, "Rejected unknown entity kind");
            Err(MatchError::InvalidEntityKind(kind.to_string()))
        }
    }
}

impl FromStr for EntityKind {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_kind(s)
    }
}
