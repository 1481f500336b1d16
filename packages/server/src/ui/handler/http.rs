//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{DisplayName, RoomId},
    infrastructure::dto::http::{NameAvailabilityDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::RoomQueryError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state
        .room_query_usecase
        .list_rooms()
        .await
        .map_err(query_error_status)?;

    // Domain Model から DTO への変換
    Ok(Json(rooms.into_iter().map(RoomSummaryDto::from).collect()))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    // 不正な ID のルームは存在し得ない
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .room_query_usecase
        .room_detail(&room_id)
        .await
        .map_err(query_error_status)?;
    Ok(Json(RoomDetailDto::from(room)))
}

/// Whether a display name is free in a room
pub async fn check_name(
    State(state): State<Arc<AppState>>,
    Path((room_id, name)): Path<(String, String)>,
) -> Result<Json<NameAvailabilityDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let display_name = DisplayName::try_from(name).map_err(|_| StatusCode::BAD_REQUEST)?;

    let available = state
        .room_query_usecase
        .is_name_available(&room_id, display_name.clone())
        .await
        .map_err(query_error_status)?;

    Ok(Json(NameAvailabilityDto {
        name: display_name.into_string(),
        available,
    }))
}

fn query_error_status(e: RoomQueryError) -> StatusCode {
    match e {
        RoomQueryError::RoomNotFound => StatusCode::NOT_FOUND,
        RoomQueryError::Room(e) => {
            tracing::error!("Room query failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
