//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use classchat_shared::time::to_rfc3339_millis;

use crate::{
    infrastructure::dto::http::{HealthDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        started_at: to_rfc3339_millis(&state.started_at),
    })
}

/// Get list of active rooms with their member counts
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|(class_id, members)| RoomSummaryDto {
            class_id: class_id.value(),
            members,
        })
        .collect();

    Json(rooms)
}
