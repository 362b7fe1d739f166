use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::registry::ConnectionRegistry;
use crate::room::repository::{
    CreateRoomResult, JoinRoomResult, LeaveRoomResult, RoomRepository,
};
use crate::shared::AppError;
use crate::websockets::{ConnectionManager, ServerMessage};

/// Why a connection is leaving its room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    Left,
    Disconnected,
}

impl LeaveReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveReason::Left => "left",
            LeaveReason::Disconnected => "disconnected",
        }
    }
}

/// Drives the room membership state machine.
///
/// Each transition mutates the room table and the connection registry, then
/// emits the resulting notifications: caller-directed events first, peer
/// broadcasts after, so the caller learns its own room state before peers
/// are told about it.
///
/// A connection in one room that creates or joins a different room is first
/// run through the full leave transition, so the back-reference and the old
/// room's member list never disagree.
pub struct MembershipCoordinator {
    rooms: Arc<dyn RoomRepository + Send + Sync>,
    registry: Arc<dyn ConnectionRegistry>,
    connections: Arc<dyn ConnectionManager>,
}

impl MembershipCoordinator {
    pub fn new(
        rooms: Arc<dyn RoomRepository + Send + Sync>,
        registry: Arc<dyn ConnectionRegistry>,
        connections: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            rooms,
            registry,
            connections,
        }
    }

    #[instrument(skip(self))]
    pub async fn handle_create(&self, conn_id: &str, room_id: &str) -> Result<(), AppError> {
        debug!(conn_id = %conn_id, room_id = %room_id, "Create room requested");

        self.leave_current_room_if_different(conn_id, room_id).await?;

        match self.rooms.create_room(room_id, conn_id).await? {
            CreateRoomResult::Created => {
                self.registry
                    .set_room(conn_id, Some(room_id.to_string()))
                    .await;
                self.send(
                    conn_id,
                    &ServerMessage::RoomCreated {
                        room_id: room_id.to_string(),
                    },
                )
                .await;
            }
            CreateRoomResult::AlreadyExists => {
                self.send(
                    conn_id,
                    &ServerMessage::Error(format!(
                        "Room {} already exists. Please join the room instead.",
                        room_id
                    )),
                )
                .await;
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn handle_join(&self, conn_id: &str, room_id: &str) -> Result<(), AppError> {
        debug!(conn_id = %conn_id, room_id = %room_id, "Join room requested");

        self.leave_current_room_if_different(conn_id, room_id).await?;

        match self.rooms.try_join_room(room_id, conn_id).await? {
            JoinRoomResult::Joined { existing_members } => {
                self.registry
                    .set_room(conn_id, Some(room_id.to_string()))
                    .await;

                self.send(
                    conn_id,
                    &ServerMessage::RoomJoined {
                        room_id: room_id.to_string(),
                    },
                )
                .await;

                // First member gets no peer-discovery events
                if !existing_members.is_empty() {
                    self.send(conn_id, &ServerMessage::AllUsers(existing_members.clone()))
                        .await;
                    self.broadcast(
                        &existing_members,
                        &ServerMessage::UserJoined(conn_id.to_string()),
                    )
                    .await;
                }
            }
            JoinRoomResult::AlreadyMember => {
                // Idempotent: confirm membership, no peer notifications
                self.send(
                    conn_id,
                    &ServerMessage::RoomJoined {
                        room_id: room_id.to_string(),
                    },
                )
                .await;
            }
            JoinRoomResult::RoomFull => {
                self.send(
                    conn_id,
                    &ServerMessage::Error(format!(
                        "Room {} is full. Please join another room.",
                        room_id
                    )),
                )
                .await;
            }
            JoinRoomResult::RoomNotFound => {
                self.send(
                    conn_id,
                    &ServerMessage::Error(format!(
                        "Room {} does not exist. Please create the room first.",
                        room_id
                    )),
                )
                .await;
            }
        }

        Ok(())
    }

    /// Removes the connection from a room and notifies remaining members.
    /// Silently a no-op for an unknown room or a non-member: leave must never
    /// fail, redundant cleanup is expected.
    #[instrument(skip(self))]
    pub async fn handle_leave(
        &self,
        conn_id: &str,
        room_id: &str,
        reason: LeaveReason,
    ) -> Result<(), AppError> {
        match self.rooms.leave_room(room_id, conn_id).await? {
            LeaveRoomResult::Left { remaining_members } => {
                self.registry.set_room(conn_id, None).await;
                info!(
                    conn_id = %conn_id,
                    room_id = %room_id,
                    reason = reason.as_str(),
                    "Connection left room"
                );
                self.broadcast(
                    &remaining_members,
                    &ServerMessage::UserLeft(conn_id.to_string()),
                )
                .await;
            }
            LeaveRoomResult::RoomDeleted => {
                // Last member out, nobody to notify
                self.registry.set_room(conn_id, None).await;
                info!(
                    conn_id = %conn_id,
                    room_id = %room_id,
                    reason = reason.as_str(),
                    "Connection left room, room deleted"
                );
            }
            LeaveRoomResult::NotAMember | LeaveRoomResult::RoomNotFound => {
                debug!(conn_id = %conn_id, room_id = %room_id, "Leave was a no-op");
            }
        }

        Ok(())
    }

    /// Transport-detected disconnect: leave whatever room the connection was
    /// in, then drop it from the registry. Always succeeds.
    #[instrument(skip(self))]
    pub async fn handle_disconnect(&self, conn_id: &str) -> Result<(), AppError> {
        if let Some(room_id) = self.registry.room_of(conn_id).await {
            self.handle_leave(conn_id, &room_id, LeaveReason::Disconnected)
                .await?;
        }
        self.registry.unregister(conn_id).await;

        Ok(())
    }

    async fn leave_current_room_if_different(
        &self,
        conn_id: &str,
        target_room_id: &str,
    ) -> Result<(), AppError> {
        if let Some(current) = self.registry.room_of(conn_id).await {
            if current != target_room_id {
                debug!(
                    conn_id = %conn_id,
                    current_room = %current,
                    target_room = %target_room_id,
                    "Auto-leaving current room"
                );
                self.handle_leave(conn_id, &current, LeaveReason::Left)
                    .await?;
            }
        }
        Ok(())
    }

    async fn send(&self, conn_id: &str, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(json) => self.connections.send_to_peer(conn_id, &json).await,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Failed to serialize outbound message")
            }
        }
    }

    async fn broadcast(&self, conn_ids: &[String], message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(json) => self.connections.send_to_peers(conn_ids, &json).await,
            Err(e) => warn!(error = %e, "Failed to serialize outbound message"),
        }
    }
}
