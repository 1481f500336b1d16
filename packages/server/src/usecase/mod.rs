//! UseCase 層
//!
//! ルームごとの Coordinator（アクター）と、それを生成・参照するためのユースケース。

pub mod error;
pub mod room_coordinator;
pub mod room_handle;
pub mod room_query;
pub mod room_registry;
pub mod write_behind;

pub use error::{RoomError, RoomQueryError};
pub use room_coordinator::RoomCoordinator;
pub use room_handle::{RoomCommand, RoomEvent, RoomHandle};
pub use room_query::RoomQueryUseCase;
pub use room_registry::{PusherFactory, RoomRegistry};
pub use write_behind::WriteBehind;
