use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tracing::Instrument;

fn request_id_of(request: &Request) -> String {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server_error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "ok"
    }
}

/// Logs one line per request inside a span carrying the request id.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "http",
        request_id = %request_id_of(&request),
        method = %request.method(),
        uri = %request.uri(),
    );

    async move {
        tracing::debug!("incoming request");

        let response = next.run(request).await;
        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                duration_ms,
                outcome = outcome(status),
                "request completed"
            );
        } else if status.is_client_error() {
            tracing::warn!(
                status = %status,
                duration_ms,
                outcome = outcome(status),
                "request completed"
            );
        } else {
            tracing::info!(
                status = %status,
                duration_ms,
                outcome = outcome(status),
                "request completed"
            );
        }

        response
    }
    .instrument(span)
    .await
}

pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classifies_status() {
        assert_eq!(outcome(StatusCode::OK), "ok");
        assert_eq!(outcome(StatusCode::NOT_FOUND), "client_error");
        assert_eq!(outcome(StatusCode::INTERNAL_SERVER_ERROR), "server_error");
    }
}
