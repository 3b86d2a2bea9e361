//! Postia Backend - content calendar API: sessions, brand preferences,
//! generated post batches and AI-assisted copy and images.

pub mod ai;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod media;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted file
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// CORS for the configured frontend origins. Credentials are allowed so
/// the session cookie travels with cross-origin requests.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/api/login", post(routes::auth::login))
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/session", get(routes::auth::session))
        .route("/api/posts", get(routes::posts::list_posts))
        .route(
            "/api/posts/{id}",
            put(routes::posts::update_post).delete(routes::posts::delete_post),
        )
        .route("/api/approve-all", post(routes::posts::approve_all))
        .route("/api/generate-calendar", post(routes::posts::generate_calendar))
        .route(
            "/api/brand-preferences",
            get(routes::brand::get_preferences).post(routes::brand::save_preferences),
        )
        .route("/api/regenerate-copy", post(routes::ai::regenerate_copy))
        .route("/api/generate-hashtags", post(routes::ai::generate_hashtags))
        .route("/api/generate-image", post(routes::ai::generate_image))
        .route("/api/upload-image", post(routes::upload::upload_image))
        .route("/upload-image", post(routes::upload::upload_image))
        .route("/uploads/images/{filename}", get(routes::upload::serve_media))
        .route("/health", get(routes::health::health_ping))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init(&config.log);

    routes::health::init_start_time();

    if config.is_production() && !config.cookie_secure {
        tracing::warn!(
            "COOKIE_SECURE is off in production; session cookies will be sent over plain HTTP"
        );
    }

    let pool = db::init_pool(&config.db).await?;
    db::run_migrations(&pool).await?;
    let seeded = db::seed_users(&pool, config.bcrypt_cost).await?;
    tracing::info!(seeded, "seed users checked");

    let generator = state::generator_from_config(&config);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(pool, config, generator);
    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestApp;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_configure_cors_skips_invalid_origins() {
        let mut config = AppConfig::from_env();
        config.allowed_origins = vec![
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ];
        let _cors = configure_cors(&config);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = TestApp::new().await;
        let req = Request::get("/api/nope").body(Body::empty()).unwrap();
        let (status, _, _) = app.send(req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let app = TestApp::new().await;
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, headers, _) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let app = TestApp::new().await;
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = app.send(req).await;
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
