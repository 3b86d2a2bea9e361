/**
 * Media Routes
 * Multipart upload into the media store and retrieval by stored name
 */
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::media;
use crate::routes::auth::AuthUser;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file_url: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("File too large")
    } else {
        AppError::validation(format!("Invalid multipart data: {}", e.body_text()))
    }
}

/// POST /api/upload-image
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| {
        AppError::validation(format!("Expected multipart form: {}", e.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        // Reject by name before buffering the body
        if original_name.trim().is_empty() {
            return Err(AppError::validation("No file selected"));
        }
        media::allowed_extension(&original_name)?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let stored = state.media.save_upload(&original_name, &bytes).await?;

        tracing::info!(user_id = user.id, filename = %stored.filename, "upload stored");
        return Ok(Json(UploadResponse {
            success: true,
            file_url: stored.url,
            filename: stored.filename,
            original_name,
            size: stored.size,
        }));
    }

    Err(AppError::validation("No file provided"))
}

/// GET /uploads/images/{filename}
pub async fn serve_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.media.read(&filename).await?;
    Ok((
        [(header::CONTENT_TYPE, media::content_type_for(&filename))],
        bytes,
    ))
}
