use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MatchError, Matcher};
use crate::models::{ErrorResponse, GetEntityRequest, GetEntityResponse, HealthResponse, SearchMatchesRequest, SearchMatchesResponse};
use crate::services::ElasticsearchClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<ElasticsearchClient>,
    pub matcher: Matcher,
    /// Page size used when a search request omits `size`
    pub default_size: u64,
}

/// Configure all entity and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/get-entity", web::post().to(get_entity))
        .route("/search-matches", web::post().to(search_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.backend.ping().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a matching error onto an HTTP response.
///
/// `not_found` is the message used when the source entity does not exist.
fn error_response(err: &MatchError, not_found: &str) -> HttpResponse {
    match err {
        MatchError::InvalidEntityKind(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid entity type".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        MatchError::EntityNotFound { .. } => HttpResponse::NotFound().json(ErrorResponse {
            error: not_found.to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        MatchError::QueryRejected(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Search query rejected".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        MatchError::BackingStoreUnavailable(_) => {
            tracing::error!("Search backend failure: {}", err);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Search backend unavailable".to_string(),
                message: err.to_string(),
                status_code: 503,
            })
        }
        MatchError::MalformedEntity { .. } => {
            tracing::error!("{}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Malformed stored document".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Get entity endpoint
///
/// POST /get-entity
///
/// Request body:
/// ```json
/// { "entity": "jobs|candidates", "id": 7 }
/// ```
async fn get_entity(
    state: web::Data<AppState>,
    req: web::Json<GetEntityRequest>,
) -> impl Responder {
    let id = req.id.to_string();

    tracing::info!("Fetching {} entity {}", req.entity, id);

    match state
        .matcher
        .get_entity(state.backend.as_ref(), &req.entity, &id)
        .await
    {
        Ok(doc) => HttpResponse::Ok().json(GetEntityResponse::from(doc)),
        Err(e) => error_response(&e, "Document not found"),
    }
}

/// Search matches endpoint
///
/// POST /search-matches
///
/// Request body:
/// ```json
/// {
///   "entity": "jobs|candidates",
///   "id": 7,
///   "filters": {
///     "salary_match": true,
///     "top_skill_match": true,
///     "seniority_match": true,
///     "minimum_should_match": 1
///   },
///   "from_index": 0,
///   "size": 100
/// }
/// ```
async fn search_matches(
    state: web::Data<AppState>,
    req: web::Json<SearchMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search_matches request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = req.id.to_string();
    // Both are non-negative after validation
    let from_index = req.from_index.unsigned_abs();
    let size = req.size.map_or(state.default_size, i64::unsigned_abs);

    tracing::info!(
        "Searching matches for {} {} (from: {}, size: {}, filters: {:?})",
        req.entity,
        id,
        from_index,
        size,
        req.filters
    );

    match state
        .matcher
        .search_matches(state.backend.as_ref(), &req.entity, &id, &req.filters, from_index, size)
        .await
    {
        Ok(page) => HttpResponse::Ok().json(SearchMatchesResponse::from(page)),
        Err(e) => error_response(&e, "Target document not found"),
    }
}
