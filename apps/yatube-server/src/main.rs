//! # Yatube Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use yatube_server::middleware::request_id::RequestIdMiddleware;
use yatube_server::telemetry::{TelemetryConfig, init_telemetry};
use yatube_server::{AppConfig, AppState, configure_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Refusing to start: {}", e);
        std::io::Error::other(e)
    })?;

    tracing::info!(
        "Starting Yatube on {}:{} ({} posts per page)",
        config.host,
        config.port,
        config.posts_per_page
    );

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
