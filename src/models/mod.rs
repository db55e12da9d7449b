// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{EntityKind, EntityRecord, JobRecord, CandidateRecord, MatchCriteria, StoredDocument, MatchedEntity, ResultPage};
pub use requests::{GetEntityRequest, SearchMatchesRequest};
pub use responses::{GetEntityResponse, SearchMatchesResponse, HealthResponse, ErrorResponse};
