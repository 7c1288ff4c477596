//! Server state management
//!
//! One editor session shared by every request. Handlers take the write lock
//! for the whole command, so commands apply one at a time.

use crate::ServerConfig;
use hexmap_core::{GeneratorConfig, Layout, Session};
use tokio::sync::RwLock;

/// Server-wide shared state
pub struct ServerState {
    pub session: RwLock<Session>,
    pub layout: Layout,
}

impl ServerState {
    pub fn new(session: Session, layout: Layout) -> Self {
        Self {
            session: RwLock::new(session),
            layout,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Session::new(config.radius, config.generator.clone()),
            config.layout,
        )
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(
            Session::new(hexmap_core::session::DEFAULT_RADIUS, GeneratorConfig::default()),
            Layout::default(),
        )
    }
}
