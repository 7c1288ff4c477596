//! HEXMAP Server - HTTP API for the map editor
//!
//! This crate provides the web backend:
//! - REST API over a single editor session
//! - Board snapshot with pixel centers and sectors for the renderer
//! - Map generation, load and save
//! - Static file serving for the renderer

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use hexmap_core::{GeneratorConfig, Layout};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Radius of the board the session starts with
    pub radius: u32,
    pub generator: GeneratorConfig,
    /// Layout used to resolve pixel clicks
    pub layout: Layout,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "hexmap/web".to_string(),
            radius: 4,
            generator: GeneratorConfig::default(),
            layout: Layout::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board snapshot
        .route("/api/board", get(routes::board::get_board))
        // Editor commands
        .route("/api/select", post(routes::editor::select_tile))
        .route("/api/click", post(routes::editor::click_cell))
        .route("/api/click-pixel", post(routes::editor::click_pixel))
        .route("/api/resize", post(routes::editor::resize_board))
        .route("/api/moves", post(routes::editor::set_max_moves))
        .route("/api/clear", post(routes::editor::clear_board))
        // Generation
        .route("/api/generate", post(routes::generate::generate_map))
        // Files
        .route("/api/load", post(routes::files::load_map))
        .route("/api/save", get(routes::files::save_map))
        // Shared state
        .with_state(state)
        // Renderer may be served from another origin during development
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::from_config(&config));
    let router = create_router(&config, state);

    tracing::info!("HEXMAP Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
