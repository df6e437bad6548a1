//! HTTP middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument as _;

/// Logging middleware: one span per request, tagged with a fresh request id.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;

        tracing::info!(
            status = %response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        response
    }
    .instrument(span)
    .await
}
