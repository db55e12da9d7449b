// Core algorithm exports
pub mod error;
pub mod matcher;
pub mod query;
pub mod shaper;
pub mod validator;

pub use error::MatchError;
pub use matcher::Matcher;
pub use query::{synthesize, render, MatchClause, MatchQuery, QueryBody, QueryBuilder, Criterion, RangeBound};
pub use shaper::{BoundedQuery, ResultShaper, MAX_RESULT_SIZE};
pub use validator::validate_kind;
