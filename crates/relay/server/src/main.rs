//! Relay Server - push registration and dispatch over HTTP.

use color_eyre::eyre::WrapErr as _;
use relay_server::Config;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("relay-server starting");

    let config_path = Config::config_path();
    let config = Config::load(&config_path)
        .wrap_err_with(|| format!("failed to load config from {}", config_path.display()))?;

    let service = relay_server::build_service(&config)?;
    let _outcomes = relay_server::log_outcomes(&service);

    let app = relay_server::app(service);

    tracing::info!(addr = %config.bind, "listening");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app).await.wrap_err("server error")?;

    Ok(())
}
