//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};
use chatrelay_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with their members
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.repository.rooms().await;

    // Domain Model から DTO への変換
    let summaries = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            name: room.name.into_string(),
            members: room.members.into_iter().map(|m| m.into_string()).collect(),
        })
        .collect();

    Json(summaries)
}

/// Get one room with the last heartbeat of each member
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room = RoomName::new(room).map_err(|_| StatusCode::BAD_REQUEST)?;
    let members = state
        .repository
        .members_of(&room)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    // registry first, then heartbeat
    let mut details = Vec::with_capacity(members.len());
    for member in members {
        let last_seen = state
            .heartbeat
            .last_seen(&member)
            .await
            .map(|seen| timestamp_to_rfc3339(seen.value()));
        details.push(MemberDetailDto {
            name: member.into_string(),
            last_seen,
        });
    }

    Ok(Json(RoomDetailDto {
        name: room.into_string(),
        members: details,
    }))
}
