//! Status endpoint
//!
//! Liveness plus a short summary of the editor session, cheap enough to poll.

use crate::state::ServerState;
use axum::{extract::State, Json};
use hexmap_core::{cell_count, TileCounts, TileKind};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
    pub session: SessionSummary,
}

#[derive(Serialize)]
pub struct SessionSummary {
    pub radius: u32,
    /// Cells on the board, occupied or not
    pub cells: usize,
    pub occupied: usize,
    pub max_moves: u32,
    pub active: Option<TileKind>,
    pub counts: TileCounts,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    let board = session.board();

    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: "hexmap",
        session: SessionSummary {
            radius: board.radius(),
            cells: cell_count(board.radius()),
            occupied: board.occupied(),
            max_moves: session.max_moves(),
            active: session.active(),
            counts: session.counts(),
        },
    })
}
