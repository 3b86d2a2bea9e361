//! Boundary to the external generative service.
//!
//! Handlers only see [`ContentGenerator`]. Calls are bounded by the client
//! timeout, and nothing in this module touches the post store, so a failed
//! call leaves stored posts as they were.

pub mod openai;
pub mod placeholder;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::models::{BrandProfile, ContentType, Platform};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI service not configured")]
    NotConfigured,

    #[error("AI request timed out")]
    Timeout,

    #[error("AI service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("AI request failed: {0}")]
    Transport(String),

    #[error("unexpected AI response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Transport(e.to_string())
        }
    }
}

impl From<AiError> for AppError {
    fn from(e: AiError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub platform: Platform,
    pub content_type: ContentType,
    pub title: String,
    pub content: String,
    pub profile: BrandProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCopy {
    pub content: String,
    pub hashtags: String,
}

#[derive(Debug, Clone)]
pub struct HashtagRequest {
    pub platform: Platform,
    pub title: String,
    pub content: String,
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagAnalysis {
    pub reach_potential: String,
    pub competition_level: String,
    pub relevance: String,
    pub recommendation: String,
}

impl Default for HashtagAnalysis {
    /// Used when the service's analysis cannot be parsed
    fn default() -> Self {
        Self {
            reach_potential: "Medio".to_string(),
            competition_level: "Medio".to_string(),
            relevance: "Alta".to_string(),
            recommendation: "Hashtags optimizados para tu audiencia objetivo".to_string(),
        }
    }
}

impl HashtagAnalysis {
    /// Accepts the bare JSON object or one wrapped in a markdown code fence.
    pub fn parse_or_default(raw: &str) -> Self {
        let trimmed = raw.trim();
        let body = match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ => trimmed,
        };
        serde_json::from_str(body).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagSuggestion {
    pub hashtags: String,
    pub analysis: HashtagAnalysis,
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub platform: Platform,
    pub title: String,
    pub content: String,
    pub profile: BrandProfile,
}

impl ImageRequest {
    pub fn prompt(&self) -> String {
        prompts::image_prompt(self)
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Improved post text plus hashtags for it.
    async fn regenerate_copy(&self, request: &CopyRequest) -> Result<GeneratedCopy, AiError>;

    async fn suggest_hashtags(&self, request: &HashtagRequest)
        -> Result<HashtagSuggestion, AiError>;

    /// Encoded image bytes (PNG).
    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>, AiError>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl ContentGenerator for DisabledGenerator {
    async fn regenerate_copy(&self, _request: &CopyRequest) -> Result<GeneratedCopy, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn suggest_hashtags(
        &self,
        _request: &HashtagRequest,
    ) -> Result<HashtagSuggestion, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn generate_image(&self, _request: &ImageRequest) -> Result<Vec<u8>, AiError> {
        Err(AiError::NotConfigured)
    }
}
