use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::sync::Arc;
use std::time::Duration;
use talent_match::config::{LogFormat, Settings};
use talent_match::core::Matcher;
use talent_match::routes::{self, matches::AppState};
use talent_match::services::ElasticsearchClient;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // LOG_LEVEL / LOG_FORMAT win over the configured values
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT")
        .map(|name| LogFormat::parse(&name))
        .unwrap_or_else(|_| settings.logging.log_format());
    init_logging(&log_level, log_format);

    info!("Starting Talent Match service...");

    let timeout = Duration::from_secs(settings.elasticsearch.timeout_secs.unwrap_or(30));
    let mut backend = ElasticsearchClient::new(
        settings.elasticsearch.url.clone(),
        settings.indices.clone().into(),
        timeout,
    )
    .map_err(|e| {
        error!("Failed to create search client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if let Some(username) = settings.elasticsearch.username.clone() {
        backend = backend.with_basic_auth(username, settings.elasticsearch.password.clone());
    }

    info!(
        "Search client initialized for {} (jobs: {}, candidates: {})",
        settings.elasticsearch.url, settings.indices.jobs, settings.indices.candidates
    );

    match backend.ping().await {
        Ok(true) => info!("Search backend reachable"),
        Ok(false) => error!("Search backend answered ping with an error status"),
        Err(e) => error!("Search backend unreachable at startup: {}", e),
    }

    let matcher = Matcher::with_max_result_size(settings.matching.max_result_size);

    info!("Matcher initialized (max result size: {})", settings.matching.max_result_size);

    let app_state = AppState {
        backend: Arc::new(backend),
        matcher,
        default_size: settings.matching.default_size,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
