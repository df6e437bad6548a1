//! Push relay server wiring.

pub mod config;

use std::sync::Arc;

use axum::Router;
use color_eyre::eyre::WrapErr as _;
use push_core::Subscription;
use push_gateway::{Dispatcher, ExpoGateway, PushService};
use push_registrar::{ConfiguredEndpoint, ExpoTokenIssuer, Registrar};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Push service as wired by the relay server.
pub type RelayService = PushService<ConfiguredEndpoint, ExpoTokenIssuer, ExpoGateway>;

/// Build the push service from config.
pub fn build_service(config: &Config) -> color_eyre::eyre::Result<Arc<RelayService>> {
    let gateway = ExpoGateway::new(&config.gateway).wrap_err("failed to create gateway")?;
    let issuer =
        ExpoTokenIssuer::new(&config.registration).wrap_err("failed to create token issuer")?;
    let endpoint = ConfiguredEndpoint::new(&config.device);

    let registrar = Registrar::new(endpoint, issuer, config.registration.project_id.clone());
    let dispatcher = Dispatcher::new(gateway, config.gateway.concurrency);

    Ok(Arc::new(PushService::new(registrar, dispatcher)))
}

/// Log every delivery outcome for as long as the subscription lives.
pub fn log_outcomes(service: &RelayService) -> Subscription {
    service.on_outcome(|event| {
        tracing::info!(token = %event.token, outcome = %event.outcome, "delivery outcome");
    })
}

/// Build the HTTP application.
pub fn app(service: Arc<RelayService>) -> Router {
    Router::new()
        .merge(push_http::push_router(service))
        .layer(TraceLayer::new_for_http())
}
