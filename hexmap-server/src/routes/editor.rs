//! Editor command endpoints
//!
//! Each handler turns its request body into one `Command` and applies it to
//! the shared session.

use super::{bad_request, ApiError};
use crate::state::ServerState;
use axum::{extract::State, Json};
use hexmap_core::{Command, Cube, Outcome, Point, TileKind, MAX_RADIUS};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SelectRequest {
    /// None deselects
    pub kind: Option<TileKind>,
}

#[derive(Deserialize)]
pub struct CellRequest {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

#[derive(Deserialize)]
pub struct PixelRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
pub struct ResizeRequest {
    pub radius: u32,
}

#[derive(Deserialize)]
pub struct MovesRequest {
    pub max_moves: i64,
}

/// Select a tile kind; selecting the active kind again deselects it
pub async fn select_tile(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;

    let outcome = match req.kind {
        Some(kind) => session.apply(Command::SelectTile(kind)).map_err(bad_request)?,
        // Deselect by re-selecting whatever is active
        None => match session.active() {
            Some(active) => session.apply(Command::SelectTile(active)).map_err(bad_request)?,
            None => Outcome::Ignored,
        },
    };

    Ok(Json(json!({
        "success": true,
        "changed": outcome != Outcome::Ignored,
        "active": session.active(),
    })))
}

/// Click a cell given in cube coordinates
pub async fn click_cell(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CellRequest>,
) -> Result<Json<Value>, ApiError> {
    let cell = Cube::from_qrs(req.q, req.r, req.s)
        .ok_or_else(|| bad_request(format!("({}, {}, {}) is not a cube coordinate", req.q, req.r, req.s)))?;
    apply_click(&state, cell).await
}

/// Click a pixel relative to the board center
pub async fn click_pixel(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PixelRequest>,
) -> Result<Json<Value>, ApiError> {
    if !req.x.is_finite() || !req.y.is_finite() {
        return Err(bad_request("pixel coordinates must be finite"));
    }
    let cell = state.layout.pixel_to_cube(Point::new(req.x, req.y));
    apply_click(&state, cell).await
}

async fn apply_click(state: &ServerState, cell: Cube) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;
    let outcome = session.apply(Command::ClickCell(cell)).map_err(bad_request)?;

    Ok(Json(json!({
        "success": true,
        "changed": outcome != Outcome::Ignored,
        "cell": cell,
        "counts": session.counts(),
    })))
}

/// Change the board radius, keeping tiles that still fit
pub async fn resize_board(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.radius > MAX_RADIUS {
        return Err(bad_request(format!("radius must be at most {MAX_RADIUS}")));
    }

    let mut session = state.session.write().await;
    session.apply(Command::Resize(req.radius)).map_err(bad_request)?;
    tracing::info!("Board resized to radius {}", req.radius);

    Ok(Json(json!({
        "success": true,
        "radius": session.board().radius(),
        "counts": session.counts(),
    })))
}

/// Set the move budget; negative values clamp to zero
pub async fn set_max_moves(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MovesRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;
    session.apply(Command::SetMaxMoves(req.max_moves)).map_err(bad_request)?;

    Ok(Json(json!({
        "success": true,
        "max_moves": session.max_moves(),
    })))
}

/// Clear the active kind, or the whole board when nothing is selected
pub async fn clear_board(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;
    session.apply(Command::Clear).map_err(bad_request)?;

    Ok(Json(json!({
        "success": true,
        "counts": session.counts(),
    })))
}
