//! Serve a saved map with the editor backend
//!
//! Run with: cargo run -p hexmap-server --example run_server -- [MAP] [PORT]
//!
//! Without MAP the session starts on an empty board.

use anyhow::Context;
use hexmap_core::{Command, Format, GeneratorConfig, Outcome, Session};
use hexmap_server::{create_router, ServerConfig, ServerState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let map = args.next().map(PathBuf::from);
    let port = match args.next() {
        Some(port) => port.parse().context("PORT must be a number")?,
        None => ServerConfig::default().port,
    };

    let config = ServerConfig {
        port,
        generator: GeneratorConfig::default().with_seed(7),
        ..ServerConfig::default()
    };

    let mut session = Session::new(config.radius, config.generator.clone());
    if let Some(path) = &map {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read map: {}", path.display()))?;
        let format = Format::from_path(path);
        let outcome = session
            .apply(Command::Load { content, format })
            .with_context(|| format!("Failed to parse map: {}", path.display()))?;
        if let Outcome::Loaded { warnings, counts } = outcome {
            println!(
                "Loaded {} (radius {}): danger={} shield={} gold={}, {} entries skipped",
                path.display(),
                session.board().radius(),
                counts.danger,
                counts.shield,
                counts.gold,
                warnings.len()
            );
        }
    }

    let state = Arc::new(ServerState::new(session, config.layout));
    let router = create_router(&config, state);

    println!("Session status at http://localhost:{}/api/status", config.port);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
