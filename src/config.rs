use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::MAX_RESULT_SIZE;
use crate::services::IndexNames;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub elasticsearch: ElasticsearchSettings,
    #[serde(default)]
    pub indices: IndexSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchSettings {
    #[serde(default = "default_elasticsearch_url")]
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            url: default_elasticsearch_url(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

fn default_elasticsearch_url() -> String { "http://elasticsearch:9200".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_jobs_index")]
    pub jobs: String,
    #[serde(default = "default_candidates_index")]
    pub candidates: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            jobs: default_jobs_index(),
            candidates: default_candidates_index(),
        }
    }
}

impl From<IndexSettings> for IndexNames {
    fn from(value: IndexSettings) -> Self {
        IndexNames {
            jobs: value.jobs,
            candidates: value.candidates,
        }
    }
}

fn default_jobs_index() -> String { "jobs".to_string() }
fn default_candidates_index() -> String { "candidates".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_result_size")]
    pub max_result_size: u64,
    /// Page size for search requests that do not name one
    #[serde(default = "default_page_size")]
    pub default_size: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_result_size: default_max_result_size(),
            default_size: default_page_size(),
        }
    }
}

fn default_max_result_size() -> u64 { MAX_RESULT_SIZE }
fn default_page_size() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Parse a configured format name; unknown names fall back to compact
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TALENT__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TALENT__ELASTICSEARCH__URL -> elasticsearch.url
            .add_source(environment())
            .build()?;

        settings = apply_elasticsearch_url(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings = apply_elasticsearch_url(settings)?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TALENT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `ELASTICSEARCH_URL` is honoured for compatibility with common deployments,
/// unless the prefixed variable is also set.
fn apply_elasticsearch_url(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let fallback = match env::var("TALENT__ELASTICSEARCH__URL") {
        Ok(_) => None,
        Err(_) => env::var("ELASTICSEARCH_URL").ok(),
    };

    override_elasticsearch_url(settings, fallback)
}

fn override_elasticsearch_url(settings: Config, url: Option<String>) -> Result<Config, ConfigError> {
    match url {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("elasticsearch.url", url)?
            .build(),
        None => Ok(settings),
    }
}
