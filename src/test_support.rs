//! Helpers shared by handler tests: an in-memory app, a scripted AI
//! generator and request plumbing.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use crate::ai::placeholder::{render_png, Rgb};
use crate::ai::{
    AiError, ContentGenerator, CopyRequest, GeneratedCopy, HashtagAnalysis, HashtagRequest,
    HashtagSuggestion, ImageRequest,
};
use crate::config::AppConfig;
use crate::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@maddalenamarketing.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const CLIENT_EMAIL: &str = "cliente1@empresa.com";
pub const CLIENT_PASSWORD: &str = "cliente123";

/// Generator that answers from fixed strings, or fails every call.
#[derive(Default)]
pub struct FakeGenerator {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn call(&self) -> Result<(), AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AiError::Timeout)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn regenerate_copy(&self, request: &CopyRequest) -> Result<GeneratedCopy, AiError> {
        self.call()?;
        Ok(GeneratedCopy {
            content: format!("Nuevo: {}", request.title),
            hashtags: format!("#{} #pymes", request.platform),
        })
    }

    async fn suggest_hashtags(
        &self,
        request: &HashtagRequest,
    ) -> Result<HashtagSuggestion, AiError> {
        self.call()?;
        Ok(HashtagSuggestion {
            hashtags: format!("#{} #emprendedores", request.industry.replace(' ', "")),
            analysis: HashtagAnalysis::default(),
        })
    }

    async fn generate_image(&self, _request: &ImageRequest) -> Result<Vec<u8>, AiError> {
        self.call()?;
        render_png(4, Rgb(0, 0, 0), Rgb(9, 9, 9))
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub generator: Arc<FakeGenerator>,
    _uploads: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_generator(FakeGenerator::default()).await
    }

    pub async fn with_generator(generator: FakeGenerator) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = AppConfig::from_env();
        config.upload_dir = uploads.path().join("images");
        config.max_upload_bytes = 64 * 1024;
        config.bcrypt_cost = crate::db::TEST_BCRYPT_COST;

        let pool = crate::db::test_pool().await;
        let generator = Arc::new(generator);
        let state = AppState::new(pool, config, generator.clone());

        Self {
            state,
            generator,
            _uploads: uploads,
        }
    }

    pub fn router(&self) -> Router {
        crate::create_app(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let res = self.router().oneshot(request).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, bytes)
    }

    /// Sends a request and parses the JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session_token={}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, _, bytes) = self.send(request).await;
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Logs in and returns the session token from the Set-Cookie header.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let request = Request::post("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap();
        let (status, headers, _) = self.send(request).await;
        assert_eq!(status, StatusCode::OK);
        session_cookie(&headers).expect("login sets a session cookie")
    }

    pub async fn login_admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn login_client(&self) -> String {
        self.login(CLIENT_EMAIL, CLIENT_PASSWORD).await
    }
}

pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("session_token="))
        .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        .filter(|token| !token.is_empty())
}
