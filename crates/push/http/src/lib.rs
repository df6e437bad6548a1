//! Push HTTP Layer
//!
//! Axum handlers exposing registration and dispatch.

mod api;
mod middleware;

pub use api::*;
pub use middleware::*;

use std::sync::Arc;

use axum::Router;
use push_gateway::{Gateway, PushService};
use push_registrar::{Endpoint, TokenIssuer};

/// Create the push API router.
pub fn push_router<E, I, G>(service: Arc<PushService<E, I, G>>) -> Router
where
    E: Endpoint + 'static,
    I: TokenIssuer + 'static,
    G: Gateway + 'static,
{
    use axum::routing::{get, post};

    Router::new()
        .route("/healthz", get(api::health_handler))
        .route("/v1/register", post(api::register_handler::<E, I, G>))
        .route("/v1/token", get(api::token_handler::<E, I, G>))
        .route("/v1/dispatch", post(api::dispatch_handler::<E, I, G>))
        .route("/v1/dispatch/self", post(api::dispatch_self_handler::<E, I, G>))
        .route("/v1/events/received", post(api::received_handler::<E, I, G>))
        .route("/v1/events/response", post(api::response_handler::<E, I, G>))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .with_state(service)
}
