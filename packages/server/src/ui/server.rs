//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{RoomQueryUseCase, RoomRegistry};

use super::{
    handler::{check_name, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Chat room server
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(RoomRegistry::new(store, pusher_factory, clock));
/// let server = Server::new(registry);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// RoomRegistry（ルームの生成と参照）
    registry: Arc<RoomRegistry>,
    /// RoomQueryUseCase（稼働中ルームの参照のユースケース）
    room_query_usecase: Arc<RoomQueryUseCase>,
}

impl Server {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        let room_query_usecase = Arc::new(RoomQueryUseCase::new(registry.clone()));
        Self {
            registry,
            room_query_usecase,
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            registry: self.registry.clone(),
            room_query_usecase: self.room_query_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/rooms/{room_id}/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/api/rooms/{room_id}/names/{name}", get(check_name))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/rooms/<room_id>/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then
    /// drain every room's persistence queue
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.registry.flush_all().await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
