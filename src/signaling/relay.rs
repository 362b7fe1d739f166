use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::websockets::{ConnectionManager, ServerMessage};

/// Forwards signaling payloads to a target connection by identity.
///
/// Stateless: targets are resolved directly against the connection map with
/// no room-membership check. Senders obtain valid targets from the
/// `all-users` / `user-joined` notifications; a stale or unknown target is
/// dropped silently rather than erroring.
pub struct RelayRouter {
    connections: Arc<dyn ConnectionManager>,
}

impl RelayRouter {
    pub fn new(connections: Arc<dyn ConnectionManager>) -> Self {
        Self { connections }
    }

    pub async fn relay_offer(&self, from: &str, target: &str, sdp: Value) {
        self.forward(
            from,
            target,
            ServerMessage::Offer {
                sdp,
                caller: from.to_string(),
            },
            "offer",
        )
        .await;
    }

    pub async fn relay_answer(&self, from: &str, target: &str, sdp: Value) {
        self.forward(
            from,
            target,
            ServerMessage::Answer {
                sdp,
                caller: from.to_string(),
            },
            "answer",
        )
        .await;
    }

    pub async fn relay_ice_candidate(&self, from: &str, target: &str, candidate: Value) {
        self.forward(
            from,
            target,
            ServerMessage::IceCandidate {
                candidate,
                from: from.to_string(),
            },
            "ice-candidate",
        )
        .await;
    }

    async fn forward(&self, from: &str, target: &str, message: ServerMessage, kind: &'static str) {
        if !self.connections.is_connected(target).await {
            debug!(
                kind = kind,
                from = %from,
                target = %target,
                "Relay target not connected, dropping"
            );
            return;
        }

        debug!(kind = kind, from = %from, target = %target, "Relaying");

        match serde_json::to_string(&message) {
            Ok(json) => self.connections.send_to_peer(target, &json).await,
            Err(e) => warn!(target = %target, error = %e, "Failed to serialize relayed message"),
        }
    }
}
