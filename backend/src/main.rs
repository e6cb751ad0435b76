//! Herbarium entry-point: loads configuration, wires adapters and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use herbarium::inbound::http::health::HealthState;
use herbarium::inbound::http::session_config::{BuildMode, session_settings};
use herbarium::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(session, bind_addr)
        .with_session_ttl(settings.session_ttl())
        .with_starter_items(settings.seed_starter_items);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "herbarium listening");
    server.await
}
