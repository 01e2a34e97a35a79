// Application configuration loaded from the environment (.env supported)

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWT_EXPIRATION_MS: i64 = 3_600_000;
// Token timestamps have one-second resolution
const MIN_JWT_EXPIRATION_MS: i64 = 1_000;
const DEFAULT_OLLAMA_MODEL: &str = "llama3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Summarization backend settings
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub api_url: String,
    pub model_name: String,
}

/// Runtime configuration for the Blog API
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub database_url: String,
    /// Base64-encoded HMAC key
    pub jwt_secret: String,
    pub jwt_expiration: Duration,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
    pub ollama: Option<OllamaConfig>,
    pub bootstrap_admin_username: Option<String>,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid("HOST"))?;

        let database_url = non_empty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let expiration_ms = match non_empty("JWT_EXPIRATION_MS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ms| *ms >= MIN_JWT_EXPIRATION_MS)
                .ok_or(ConfigError::Invalid("JWT_EXPIRATION_MS"))?,
            None => DEFAULT_JWT_EXPIRATION_MS,
        };

        let cors_allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let ollama = non_empty("OLLAMA_API_URL").map(|api_url| OllamaConfig {
            api_url,
            model_name: non_empty("OLLAMA_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        });

        Ok(Self {
            addr,
            database_url,
            jwt_secret,
            jwt_expiration: Duration::milliseconds(expiration_ms),
            cors_allowed_origins,
            ollama,
            bootstrap_admin_username: non_empty("BOOTSTRAP_ADMIN_USERNAME"),
        })
    }
}
