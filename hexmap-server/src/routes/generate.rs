//! Map generation endpoint

use super::{bad_request, ApiError};
use crate::state::ServerState;
use axum::{extract::State, Json};
use hexmap_core::{Command, Outcome, Preserve};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    #[serde(default)]
    pub preserve: Preserve,
}

/// Regenerate the board, keeping the tile kinds `preserve` names
pub async fn generate_map(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;

    match session.apply(Command::Generate(req.preserve)).map_err(bad_request)? {
        Outcome::Generated { report, counts } => {
            if !report.connected {
                tracing::warn!(
                    "Generated map is disconnected after {} attempts",
                    report.danger_attempts
                );
            }
            Ok(Json(json!({
                "success": true,
                "report": report,
                "counts": counts,
            })))
        }
        other => Err(bad_request(format!("unexpected outcome: {other:?}"))),
    }
}
