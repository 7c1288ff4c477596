//! Server command - start the editor backend
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: validate_static_dir()
//! - Level 4: configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::{GeneratorConfig, Layout};
use hexmap_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing the renderer's static files
    #[arg(long, default_value = "hexmap/web")]
    pub static_dir: PathBuf,

    /// Radius of the initial board
    #[arg(long, default_value = "4")]
    pub radius: u32,

    /// Generator configuration JSON
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, seed)?;

    tracing::info!("Starting HEXMAP editor server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    let mut generator = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load generator config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = seed {
        generator.seed = Some(seed);
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        radius: args.radius,
        generator,
        layout: Layout::default(),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(config))
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ServerArgs {
        ServerArgs {
            port: 8003,
            static_dir: PathBuf::from("test_static"),
            radius: 5,
            config: None,
        }
    }

    #[test]
    fn test_configure_server_defaults() {
        let config = configure_server(&args(), None).unwrap();
        assert_eq!(config.port, 8003);
        assert_eq!(config.static_dir, "test_static");
        assert_eq!(config.radius, 5);
        assert_eq!(config.generator.seed, None);
    }

    #[test]
    fn test_seed_reaches_generator() {
        let config = configure_server(&args(), Some(11)).unwrap();
        assert_eq!(config.generator.seed, Some(11));
    }

    #[test]
    fn test_validate_static_dir_nonexistent() {
        // Should not error, just warn
        let result = validate_static_dir(Path::new("/nonexistent/path"));
        assert!(result.is_ok());
    }
}
