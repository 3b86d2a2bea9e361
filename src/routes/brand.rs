/**
 * Brand Preference Routes
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::models::{BrandProfile, BrandProfileInput};
use crate::error::{AppResult, ValidJson};
use crate::routes::auth::AuthUser;
use crate::routes::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct BrandPreferencesResponse {
    pub success: bool,
    pub preferences: BrandProfile,
}

/// GET /api/brand-preferences
/// Users who never saved a profile get the documented defaults.
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<BrandPreferencesResponse>> {
    let preferences = state.brands.get(user.id).await?;
    Ok(Json(BrandPreferencesResponse {
        success: true,
        preferences,
    }))
}

/// POST /api/brand-preferences
pub async fn save_preferences(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(input): ValidJson<BrandProfileInput>,
) -> AppResult<Json<MessageResponse>> {
    state.brands.upsert(user.id, &input).await?;

    tracing::info!(user_id = user.id, "brand preferences saved");
    Ok(Json(MessageResponse::ok("Brand preferences saved")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    async fn fetch(app: &TestApp, token: &str) -> BrandProfile {
        let (status, body) = app
            .call(Method::GET, "/api/brand-preferences", Some(token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let res: BrandPreferencesResponse = serde_json::from_value(body).unwrap();
        assert!(res.success);
        res.preferences
    }

    #[tokio::test]
    async fn test_defaults_before_first_save() {
        let app = TestApp::new().await;
        let token = app.login_client().await;

        let prefs = fetch(&app, &token).await;
        assert_eq!(prefs, BrandProfile::default());
        assert_eq!(prefs.brand_colors, "#3B82F6,#1E40AF,#FFFFFF,#F3F4F6");
        assert_eq!(prefs.communication_tone, "profesional");
        assert!(prefs.created_at.is_none());
    }

    #[tokio::test]
    async fn test_save_then_overwrite() {
        let app = TestApp::new().await;
        let token = app.login_client().await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/brand-preferences",
                Some(&token),
                Some(json!({ "brand_name": "Acme", "industry": "retail" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let prefs = fetch(&app, &token).await;
        assert_eq!(prefs.brand_name, "Acme");
        assert_eq!(prefs.industry, "retail");
        // omitted fields are stored empty rather than defaulted
        assert_eq!(prefs.communication_tone, "");
        assert!(prefs.created_at.is_some());

        app.call(
            Method::POST,
            "/api/brand-preferences",
            Some(&token),
            Some(json!({ "brand_name": "Acme 2" })),
        )
        .await;
        let prefs = fetch(&app, &token).await;
        assert_eq!(prefs.brand_name, "Acme 2");
        assert_eq!(prefs.industry, "");

        let (status, _) = app
            .call(
                Method::POST,
                "/api/brand-preferences",
                Some(&token),
                Some(json!({ "brand_name": "Acme 3", "industry": null, "platforms": null })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let prefs = fetch(&app, &token).await;
        assert_eq!(prefs.brand_name, "Acme 3");
        assert_eq!(prefs.industry, "");
        assert_eq!(prefs.platforms, "");
    }

    #[tokio::test]
    async fn test_profiles_are_per_user() {
        let app = TestApp::new().await;
        let admin = app.login_admin().await;
        let client = app.login_client().await;

        app.call(
            Method::POST,
            "/api/brand-preferences",
            Some(&admin),
            Some(json!({ "brand_name": "Maddalena" })),
        )
        .await;

        assert_eq!(fetch(&app, &client).await, BrandProfile::default());
    }

    #[tokio::test]
    async fn test_requires_session() {
        let app = TestApp::new().await;
        let (status, _) = app
            .call(Method::GET, "/api/brand-preferences", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
