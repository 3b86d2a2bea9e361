//! Shared handles given to every handler through axum `State`.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::ai::{openai::OpenAiGenerator, ContentGenerator, DisabledGenerator};
use crate::config::AppConfig;
use crate::db::{brand::BrandStore, posts::PostStore, users::UserStore};
use crate::media::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub users: UserStore,
    pub brands: BrandStore,
    pub posts: PostStore,
    pub media: MediaStore,
    pub generator: Arc<dyn ContentGenerator>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig, generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            users: UserStore::new(pool.clone(), config.session_ttl_days, config.bcrypt_cost),
            brands: BrandStore::new(pool.clone()),
            posts: PostStore::new(pool.clone()),
            media: MediaStore::new(config.upload_dir.clone(), config.max_upload_bytes),
            pool,
            config: Arc::new(config),
            generator,
        }
    }
}

/// OpenAI client when a key is configured, otherwise a generator that
/// always reports "not configured".
pub fn generator_from_config(config: &AppConfig) -> Arc<dyn ContentGenerator> {
    match OpenAiGenerator::from_config(&config.ai) {
        Ok(Some(client)) => {
            tracing::info!(model = %config.ai.chat_model, "AI generator enabled");
            Arc::new(client)
        }
        Ok(None) => {
            tracing::warn!("OPENAI_API_KEY not set; AI features disabled");
            Arc::new(DisabledGenerator)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to build AI client; AI features disabled");
            Arc::new(DisabledGenerator)
        }
    }
}
