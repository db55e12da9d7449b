// Service exports
pub mod backend;
pub mod elasticsearch;

pub use backend::{BackendError, RawHit, SearchBackend, SearchHits};
pub use elasticsearch::{ElasticsearchClient, IndexNames};
