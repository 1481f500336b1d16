//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{RoomQueryUseCase, RoomRegistry};

/// Shared application state
pub struct AppState {
    /// RoomRegistry（ルームの生成と参照）
    pub registry: Arc<RoomRegistry>,
    /// RoomQueryUseCase（稼働中ルームの参照のユースケース）
    pub room_query_usecase: Arc<RoomQueryUseCase>,
}
