//! Runtime configuration read from the environment.
//!
//! Every value has a development default so the service starts with no
//! `.env` file at all. Malformed numbers fall back to the default.

use std::path::PathBuf;
use std::time::Duration;

use crate::logging::config::LogConfig;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: env_or("DATABASE_URL", "sqlite://postia.db?mode=rwc"),
            max_connections: env_parse("DB_POOL_MAX", 5),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT", 3),
        }
    }
}

/// Settings for the external generative service.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            chat_model: env_or("OPENAI_MODEL", "gpt-4.1-mini"),
            image_model: env_or("OPENAI_IMAGE_MODEL", "dall-e-3"),
            timeout: Duration::from_secs(env_parse("AI_TIMEOUT_SECS", 30)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    pub ai: AiConfig,
    pub log: LogConfig,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                    "http://localhost:5001".to_string(),
                ]
            });

        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 5001),
            db: DbConfig::default(),
            ai: AiConfig::default(),
            log: LogConfig::from_env(),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads/images")),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 50 * 1024 * 1024),
            session_ttl_days: env_parse("SESSION_TTL_DAYS", 7),
            cookie_secure: env_parse("COOKIE_SECURE", false),
            bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST),
            allowed_origins,
        }
    }

    pub fn is_production(&self) -> bool {
        self.log.is_production()
    }
}
