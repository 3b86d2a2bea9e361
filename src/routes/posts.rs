/**
 * Post Routes
 * Listing, editing, approval and calendar generation for the caller's posts
 */
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, CalendarRequest};
use crate::db::models::{null_as_default, ContentType, Platform, Post, PostUpdate};
use crate::error::{AppError, AppResult, ValidJson};
use crate::routes::auth::AuthUser;
use crate::routes::MessageResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsResponse {
    pub success: bool,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateCalendarResponse {
    pub success: bool,
    pub generated: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveAllResponse {
    pub success: bool,
    pub approved: u64,
    pub message: String,
}

/// Editor payload. Every stored field except status is overwritten.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: ContentType,
    #[serde(deserialize_with = "null_as_default")]
    pub hashtags: String,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub platforms: Vec<Platform>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_files: Vec<String>,
}

impl UpdatePostRequest {
    fn into_update(self) -> AppResult<PostUpdate> {
        let scheduled_date = match self.scheduled_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::validation("scheduled_date must be formatted YYYY-MM-DD")
            })?),
        };

        let scheduled_time = match self.scheduled_time.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|_| AppError::validation("scheduled_time must be formatted HH:MM"))?
                .format("%H:%M")
                .to_string(),
        };

        let media_files = self
            .media_files
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        Ok(PostUpdate {
            title: self.title,
            content: self.content,
            content_type: self.content_type,
            hashtags: self.hashtags,
            scheduled_date,
            scheduled_time,
            platform: self.platforms.first().copied().unwrap_or_default(),
            media_files,
        })
    }
}

/// Post ids in the path that are not integers cannot name a stored post.
fn parse_post_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::not_found("Post not found"))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<PostsResponse>> {
    let posts = state.posts.list(user.id).await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdatePostRequest>,
) -> AppResult<Json<MessageResponse>> {
    let post_id = parse_post_id(&id)?;
    let update = payload.into_update()?;
    state.posts.update(user.id, post_id, &update).await?;

    tracing::info!(user_id = user.id, post_id, "post updated");
    Ok(Json(MessageResponse::ok("Post updated")))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let post_id = parse_post_id(&id)?;
    state.posts.delete(user.id, post_id).await?;

    tracing::info!(user_id = user.id, post_id, "post deleted");
    Ok(Json(MessageResponse::ok("Post deleted")))
}

/// POST /api/approve-all
pub async fn approve_all(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<ApproveAllResponse>> {
    let approved = state.posts.approve_all_drafts(user.id).await?;

    tracing::info!(user_id = user.id, count = approved, "drafts approved");
    Ok(Json(ApproveAllResponse {
        success: true,
        approved,
        message: format!("{} posts approved", approved),
    }))
}

/// POST /api/generate-calendar
/// Replaces every post the caller owns with a new draft batch.
pub async fn generate_calendar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(request): ValidJson<CalendarRequest>,
) -> AppResult<Json<GenerateCalendarResponse>> {
    let profile = state.brands.get(user.id).await?;
    let generated = calendar::generate_calendar(&state.posts, user.id, request, &profile).await?;

    Ok(Json(GenerateCalendarResponse {
        success: true,
        generated,
        message: format!("{} posts generated", generated),
    }))
}
