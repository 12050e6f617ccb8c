use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::session::RoomSessionHandler;
use crate::shared::AppState;

use super::socket::Connection;

/// WebSocket endpoint, one room session per upgraded connection
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let connection_id = Uuid::new_v4().to_string();
    info!(connection_id = %connection_id, "WebSocket connection requested");

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, connection_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: WebSocket, connection_id: String, app_state: AppState) {
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let session = RoomSessionHandler::new(
        connection_id.clone(),
        app_state.registry.clone(),
        app_state.connection_manager.clone(),
        app_state.room_ids.clone(),
    );

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        Box::new(session),
    );

    // Run the connection until disconnect; the session cleans up its room on the way out
    match connection.run().await {
        Ok(()) => info!(connection_id = %connection_id, "WebSocket connection closed cleanly"),
        Err(e) => warn!(
            connection_id = %connection_id,
            error = %e,
            "WebSocket connection error"
        ),
    }

    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;
}
