/**
 * AI Routes
 * On-demand copy, hashtag and image generation. Nothing here writes to the
 * post store; the editor saves results through the normal update route.
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::ai::{
    placeholder, CopyRequest, HashtagAnalysis, HashtagRequest, ImageRequest,
};
use crate::db::models::{ContentType, Platform};
use crate::error::{AppError, AppResult, ValidJson};
use crate::routes::auth::AuthUser;
use crate::state::AppState;

const FALLBACK_INDUSTRY: &str = "marketing digital";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegenerateCopyRequest {
    pub post_id: Option<i64>,
    pub platform: Platform,
    pub content_type: ContentType,
    #[serde(alias = "title")]
    pub current_title: String,
    #[serde(alias = "content")]
    pub current_content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegenerateCopyResponse {
    pub success: bool,
    pub new_content: String,
    pub new_hashtags: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateHashtagsRequest {
    pub title: String,
    pub content: String,
    pub platform: Platform,
    pub industry: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateHashtagsResponse {
    pub success: bool,
    pub hashtags: String,
    pub analysis: HashtagAnalysis,
    pub platform: Platform,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateImageRequest {
    pub title: String,
    pub content: String,
    pub platform: Platform,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub success: bool,
    pub image_url: String,
    pub prompt_used: String,
    /// True when the generator failed and a brand-coloured stand-in was stored.
    pub placeholder: bool,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/regenerate-copy
pub async fn regenerate_copy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<RegenerateCopyRequest>,
) -> AppResult<Json<RegenerateCopyResponse>> {
    let mut title = payload.current_title;
    let mut content = payload.current_content;

    if let Some(post_id) = payload.post_id {
        let post = state.posts.get(user.id, post_id).await?;
        if title.trim().is_empty() {
            title = post.title;
        }
        if content.trim().is_empty() {
            content = post.content;
        }
    }

    let request = CopyRequest {
        platform: payload.platform,
        content_type: payload.content_type,
        title,
        content,
        profile: state.brands.get(user.id).await?,
    };
    let generated = state.generator.regenerate_copy(&request).await?;

    tracing::info!(
        user_id = user.id,
        post_id = ?payload.post_id,
        platform = %request.platform,
        "copy regenerated"
    );
    Ok(Json(RegenerateCopyResponse {
        success: true,
        new_content: generated.content,
        new_hashtags: generated.hashtags,
        message: "Copy regenerated".to_string(),
    }))
}

/// POST /api/generate-hashtags
pub async fn generate_hashtags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<GenerateHashtagsRequest>,
) -> AppResult<Json<GenerateHashtagsResponse>> {
    if payload.title.trim().is_empty() && payload.content.trim().is_empty() {
        return Err(AppError::validation("Title or content is required"));
    }

    let industry = match payload.industry.filter(|i| !i.trim().is_empty()) {
        Some(industry) => industry,
        None => {
            let profile = state.brands.get(user.id).await?;
            if profile.industry.trim().is_empty() {
                FALLBACK_INDUSTRY.to_string()
            } else {
                profile.industry
            }
        }
    };

    let request = HashtagRequest {
        platform: payload.platform,
        title: payload.title,
        content: payload.content,
        industry,
    };
    let suggestion = state.generator.suggest_hashtags(&request).await?;

    tracing::info!(user_id = user.id, platform = %request.platform, "hashtags generated");
    Ok(Json(GenerateHashtagsResponse {
        success: true,
        hashtags: suggestion.hashtags,
        analysis: suggestion.analysis,
        platform: request.platform,
        message: "Hashtags generated".to_string(),
    }))
}

/// POST /api/generate-image
/// Falls back to a placeholder in the brand palette when generation fails.
pub async fn generate_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(payload): ValidJson<GenerateImageRequest>,
) -> AppResult<Json<GenerateImageResponse>> {
    let request = ImageRequest {
        platform: payload.platform,
        title: payload.title,
        content: payload.content,
        profile: state.brands.get(user.id).await?,
    };
    let prompt = request.prompt();

    let (bytes, is_placeholder) = match state.generator.generate_image(&request).await {
        Ok(bytes) => (bytes, false),
        Err(e) => {
            tracing::warn!(
                user_id = user.id,
                error = %e,
                "image generation failed, using placeholder"
            );
            let profile = request.profile.clone();
            let bytes =
                tokio::task::spawn_blocking(move || placeholder::placeholder_for(&profile)).await??;
            (bytes, true)
        }
    };

    let stored = state.media.save_generated_png(&bytes).await?;

    tracing::info!(
        user_id = user.id,
        filename = %stored.filename,
        placeholder = is_placeholder,
        "image generated"
    );
    Ok(Json(GenerateImageResponse {
        success: true,
        image_url: stored.url,
        prompt_used: prompt,
        placeholder: is_placeholder,
        message: if is_placeholder {
            "Placeholder image generated".to_string()
        } else {
            "Image generated".to_string()
        },
    }))
}
