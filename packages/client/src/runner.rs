//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::should_attempt_reconnect,
    error::ClientError,
    session::{SessionState, run_client_session},
    ui::spawn_readline,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// # Arguments
///
/// * `url` - Base server URL, e.g. `ws://127.0.0.1:8080`
/// * `room` - Room id to join
/// * `name` - Initial display name
pub async fn run_client(
    url: String,
    room: String,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = SessionState::new(room, name);
    let mut input_rx = spawn_readline(state.name.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to room '{}' as '{}' (attempt {}/{})",
            state.room,
            state.name(),
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut state, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                // 接続できていたなら試行回数を数え直す
                if matches!(e, ClientError::ConnectionLost(_)) {
                    reconnect_count = 0;
                }
                tracing::warn!("{}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!("Giving up after {} attempts", reconnect_count);
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
