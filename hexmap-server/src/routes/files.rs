//! Map load and save endpoints

use super::{bad_request, ApiError};
use crate::state::ServerState;
use axum::{
    extract::{Query, State},
    Json,
};
use hexmap_core::{Command, Format, Outcome};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoadRequest {
    pub format: Format,
    pub content: String,
}

/// Replace the session's board with a decoded map
///
/// Structural errors reject the whole file and leave the board untouched;
/// skipped entries come back as warnings.
pub async fn load_map(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;
    let command = Command::Load {
        content: req.content,
        format: req.format,
    };

    match session.apply(command).map_err(bad_request)? {
        Outcome::Loaded { warnings, counts } => {
            tracing::info!(
                "Loaded radius {} map ({} warnings)",
                session.board().radius(),
                warnings.len()
            );
            Ok(Json(json!({
                "success": true,
                "radius": session.board().radius(),
                "max_moves": session.max_moves(),
                "counts": counts,
                "warnings": warnings,
            })))
        }
        other => Err(bad_request(format!("unexpected outcome: {other:?}"))),
    }
}

#[derive(Deserialize)]
pub struct SaveParams {
    pub format: Option<Format>,
}

/// Encode the session's map; JSON unless `?format=text`
pub async fn save_map(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SaveParams>,
) -> Result<Json<Value>, ApiError> {
    let format = params.format.unwrap_or(Format::Json);
    let mut session = state.session.write().await;

    match session.apply(Command::Save(format)).map_err(bad_request)? {
        Outcome::Saved(content) => Ok(Json(json!({
            "success": true,
            "format": format,
            "filename": format!("map.{}", format.extension()),
            "content": content,
        }))),
        other => Err(bad_request(format!("unexpected outcome: {other:?}"))),
    }
}
