use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Where and how verbosely to log
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub environment: Environment,
    pub level: String,
    pub directory: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let environment = Environment::parse(&std::env::var("ENVIRONMENT").unwrap_or_default());
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| match environment {
            Environment::Production => "info".to_string(),
            Environment::Development => "debug".to_string(),
        });

        Self {
            environment,
            level,
            directory: std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> String {
        format!(
            "postia_backend={},tower_http=debug,axum=debug,sqlx=warn",
            self.level
        )
    }
}
