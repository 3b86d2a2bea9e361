/**
 * Authentication Routes
 * Cookie sessions backed by the user table: login, logout and session lookup
 */
use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::models::{User, UserInfo};
use crate::error::{AppError, AppResult, ValidJson, NOT_AUTHENTICATED};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_token";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserInfo,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Token from the session cookie, falling back to `Authorization: Bearer`.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        });

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// ============================================================================
// Extractor
// ============================================================================

/// The user owning the request's session. Rejects with 401 when the token
/// is missing, unknown or expired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            extract_session_token(&parts.headers).ok_or(AppError::Unauthorized(NOT_AUTHENTICATED))?;

        match state.users.resolve_session(&token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(AppError::Unauthorized(NOT_AUTHENTICATED)),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let user = state.users.authenticate(&email, &password).await?;
    let token = state.users.create_session(&user).await?;
    let cookie = session_cookie(
        &token,
        state.users.session_ttl().num_seconds(),
        state.config.cookie_secure,
    );

    tracing::info!(user_id = user.id, role = ?user.role, "user logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/logout
/// Always succeeds; a token that still resolves is invalidated first.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = extract_session_token(&headers) {
        if state.users.clear_session(&token).await? {
            tracing::info!("session invalidated");
        }
    }

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie("", 0, state.config.cookie_secure),
        )],
        Json(super::MessageResponse::ok("Logged out")),
    ))
}

/// GET /api/session
pub async fn session(AuthUser(user): AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        user: UserInfo::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorResponse, INVALID_CREDENTIALS};
    use crate::test_support::{session_cookie as cookie_token, TestApp, ADMIN_EMAIL};
    use axum::body::Body;
    use axum::http::{HeaderValue, Method, Request, StatusCode};

    fn login_request(body: &str) -> Request<Body> {
        Request::post("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_extract_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("xyz"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token="));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 60, true);
        assert!(cookie.starts_with("session_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(cookie.ends_with("; Secure"));
        assert!(!session_cookie("tok", 60, false).contains("Secure"));
    }

    #[tokio::test]
    async fn test_login_success_sets_cookie() {
        let app = TestApp::new().await;
        let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": "admin123" });
        let (status, headers, bytes) = app.send(login_request(&body.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let token = cookie_token(&headers).unwrap();
        assert_eq!(token.len(), 64);

        let res: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(res.success);
        assert_eq!(res.user.email, ADMIN_EMAIL);
        assert_eq!(res.user.full_name, "Charly Maddalena");
    }

    #[tokio::test]
    async fn test_login_wrong_password_matches_unknown_email() {
        let app = TestApp::new().await;

        let wrong = serde_json::json!({ "email": ADMIN_EMAIL, "password": "nope" });
        let (s1, h1, b1) = app.send(login_request(&wrong.to_string())).await;
        let unknown = serde_json::json!({ "email": "ghost@example.com", "password": "nope" });
        let (s2, h2, b2) = app.send(login_request(&unknown.to_string())).await;

        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s1, s2);
        assert_eq!(b1, b2);
        assert!(cookie_token(&h1).is_none());
        assert!(cookie_token(&h2).is_none());

        let err: ErrorResponse = serde_json::from_slice(&b1).unwrap();
        assert_eq!(err.error, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_login_missing_fields_returns_bad_request() {
        let app = TestApp::new().await;

        let (status, _, _) = app
            .send(login_request(r#"{"email":"admin@maddalenamarketing.com"}"#))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.send(login_request(r#"{"email":"","password":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.send(login_request("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_email_is_case_insensitive() {
        let app = TestApp::new().await;
        let token = app
            .login("Admin@MaddalenaMarketing.com", "admin123")
            .await;
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_protected_route_requires_session() {
        let app = TestApp::new().await;

        let (status, body) = app.call(Method::GET, "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], NOT_AUTHENTICATED);

        let (status, _) = app
            .call(Method::GET, "/api/posts", Some("not-a-real-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_token_is_accepted() {
        let app = TestApp::new().await;
        let token = app.login_client().await;

        let req = Request::get("/api/session")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, _, bytes) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);
        let res: SessionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(res.user.email, "cliente1@empresa.com");
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let app = TestApp::new().await;
        let token = app.login_admin().await;

        let (status, _) = app.call(Method::GET, "/api/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let req = Request::post("/api/logout")
            .header(header::COOKIE, format!("session_token={}", token))
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);
        let cleared = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));

        let (status, _) = app.call(Method::GET, "/api/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_session_still_succeeds() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::POST, "/api/logout", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_new_login_replaces_previous_session() {
        let app = TestApp::new().await;
        let first = app.login_admin().await;
        let second = app.login_admin().await;
        assert_ne!(first, second);

        let (status, _) = app.call(Method::GET, "/api/session", Some(&first), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app.call(Method::GET, "/api/session", Some(&second), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
