use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::shared::{AppError, AppState};
use crate::signaling::{LeaveReason, MembershipCoordinator, RelayRouter};
use crate::websockets::messages::ClientMessage;

use super::socket::{Connection, MessageHandler};

/// Decodes inbound signaling events and routes them to the membership
/// coordinator or the relay router
pub struct SignalingReceiveHandler {
    coordinator: Arc<MembershipCoordinator>,
    relay: Arc<RelayRouter>,
}

impl SignalingReceiveHandler {
    pub fn new(coordinator: Arc<MembershipCoordinator>, relay: Arc<RelayRouter>) -> Self {
        Self { coordinator, relay }
    }
}

#[async_trait]
impl MessageHandler for SignalingReceiveHandler {
    async fn handle_message(&self, conn_id: &str, message: String) {
        debug!(conn_id = %conn_id, message = %message, "Received message");

        let client_message = match serde_json::from_str::<ClientMessage>(&message) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    conn_id = %conn_id,
                    error = %e,
                    "Failed to parse signaling message"
                );
                return;
            }
        };

        let result = match client_message {
            ClientMessage::Create(room_id) => {
                self.coordinator.handle_create(conn_id, &room_id).await
            }
            ClientMessage::Join(room_id) => self.coordinator.handle_join(conn_id, &room_id).await,
            ClientMessage::LeaveRoom(room_id) => {
                self.coordinator
                    .handle_leave(conn_id, &room_id, LeaveReason::Left)
                    .await
            }
            ClientMessage::Offer { target, sdp } => {
                self.relay.relay_offer(conn_id, &target, sdp).await;
                Ok(())
            }
            ClientMessage::Answer { target, sdp } => {
                self.relay.relay_answer(conn_id, &target, sdp).await;
                Ok(())
            }
            ClientMessage::IceCandidate { target, candidate } => {
                self.relay.relay_ice_candidate(conn_id, &target, candidate).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(conn_id = %conn_id, error = %e, "Signaling transition failed");
        }
    }
}

/// WebSocket endpoint: GET /ws
///
/// Mints the connection's identity and registers it before the upgrade, so a
/// registry conflict surfaces as an HTTP error instead of a dead socket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let conn_id = Uuid::new_v4().to_string();

    app_state.registry.register(&conn_id).await?;

    info!(conn_id = %conn_id, "WebSocket connection requested");

    Ok(ws.on_upgrade(move |socket| handle_websocket_connection(socket, conn_id, app_state)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    conn_id: String,
    app_state: AppState,
) {
    info!(conn_id = %conn_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(conn_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(SignalingReceiveHandler::new(
        app_state.coordinator.clone(),
        app_state.relay.clone(),
    ));

    let connection = Connection::new(
        conn_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(conn_id = %conn_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(conn_id = %conn_id, error = ?e, "WebSocket connection error");
        }
    }

    // Cleanup: stop delivery first, then run the disconnect transition so
    // remaining room members get their user-left notification
    app_state.connection_manager.remove_connection(&conn_id).await;

    if let Err(e) = app_state.coordinator.handle_disconnect(&conn_id).await {
        warn!(conn_id = %conn_id, error = %e, "Disconnect cleanup failed");
    }

    info!(conn_id = %conn_id, "WebSocket disconnect handled");
}
