//! Board snapshot endpoint
//!
//! Everything the renderer needs to draw the current session: every cell
//! with its pixel center, outline, sector and tile, plus the per-kind counts.

use crate::state::ServerState;
use axum::{extract::State, Json};
use hexmap_core::{board_cells, Layout, Point, Sector, Session, Tile, TileCounts, TileKind};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HexInfo {
    pub q: i32,
    pub r: i32,
    pub s: i32,
    pub x: f64,
    pub y: f64,
    /// Hexagon outline, clockwise from the upper-right vertex
    pub corners: [Point; 6],
    /// None for the center cell
    pub sector: Option<Sector>,
    /// "D", "S", a gold count, or null
    pub value: Value,
}

#[derive(Serialize)]
pub struct BoardInfo {
    pub radius: u32,
    pub max_moves: u32,
    pub active: Option<TileKind>,
    pub layout: Layout,
    pub counts: TileCounts,
    pub connected: bool,
    pub hexes: Vec<HexInfo>,
}

/// Wire value of a tile, matching the JSON map format
pub fn tile_value(tile: Option<Tile>) -> Value {
    match tile {
        Some(Tile::Danger) => Value::from("D"),
        Some(Tile::Shield) => Value::from("S"),
        Some(Tile::Gold(n)) => Value::from(n),
        None => Value::Null,
    }
}

pub fn board_info(session: &Session, layout: &Layout) -> BoardInfo {
    let board = session.board();
    let hexes = board_cells(board.radius())
        .map(|cell| {
            let center = layout.cube_to_pixel(cell);
            HexInfo {
                q: cell.q(),
                r: cell.r(),
                s: cell.s(),
                x: center.x,
                y: center.y,
                corners: layout.corners(center),
                sector: cell.sector(),
                value: tile_value(board.get(cell)),
            }
        })
        .collect();

    BoardInfo {
        radius: board.radius(),
        max_moves: session.max_moves(),
        active: session.active(),
        layout: *layout,
        counts: session.counts(),
        connected: board.is_connected(),
        hexes,
    }
}

/// Get the current board
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<BoardInfo> {
    let session = state.session.read().await;
    Json(board_info(&session, &state.layout))
}
