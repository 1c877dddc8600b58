//! # Yatube Server
//!
//! actix-web application serving the Yatube pages. The binary in `main.rs`
//! wires configuration and telemetry around [`handlers::configure_routes`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod templates;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;
