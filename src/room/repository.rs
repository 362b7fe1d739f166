use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

use super::models::RoomModel;
use crate::shared::AppError;

/// Result of attempting to create a room
#[derive(Debug, Clone)]
pub enum CreateRoomResult {
    /// Room created with the creator as sole member
    Created,
    /// A room with this id already exists
    AlreadyExists,
}

/// Result of attempting to join a room
#[derive(Debug, Clone)]
pub enum JoinRoomResult {
    /// Successfully joined; carries the member list as it was before the join
    Joined { existing_members: Vec<String> },
    /// Connection was already a member, nothing changed
    AlreadyMember,
    /// Room is at capacity
    RoomFull,
    /// Room does not exist
    RoomNotFound,
}

/// Result of attempting to leave a room
#[derive(Debug, Clone)]
pub enum LeaveRoomResult {
    /// Successfully left; carries the members remaining in the room
    Left { remaining_members: Vec<String> },
    /// Left and the room became empty, so it was deleted
    RoomDeleted,
    /// Connection was not a member of the room
    NotAMember,
    /// Room does not exist
    RoomNotFound,
}

/// Trait for room table operations
///
/// The compound operations are atomic: "check capacity, decide, append" and
/// "remove member, check emptiness, delete room" each run as one critical
/// section, so concurrent joins can never overfill a room and an emptied
/// room is deleted in the same step that empties it.
#[async_trait]
pub trait RoomRepository {
    /// Atomically creates a room with the creator as its sole member
    async fn create_room(&self, room_id: &str, creator: &str)
        -> Result<CreateRoomResult, AppError>;

    async fn exists(&self, room_id: &str) -> Result<bool, AppError>;

    /// Snapshot of the room's member ids in insertion order. Empty for an
    /// unknown room. A copy, not a live view.
    async fn members(&self, room_id: &str) -> Result<Vec<String>, AppError>;

    /// Atomically attempts to add a connection to a room
    async fn try_join_room(&self, room_id: &str, conn_id: &str)
        -> Result<JoinRoomResult, AppError>;

    /// Atomically removes a connection from a room, deleting the room if it
    /// becomes empty
    async fn leave_room(&self, room_id: &str, conn_id: &str)
        -> Result<LeaveRoomResult, AppError>;
}

/// In-memory implementation of RoomRepository
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(
        &self,
        room_id: &str,
        creator: &str,
    ) -> Result<CreateRoomResult, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        if rooms.contains_key(room_id) {
            debug!(room_id = %room_id, "Room already exists");
            return Ok(CreateRoomResult::AlreadyExists);
        }

        let mut room = RoomModel::new(room_id.to_string());
        room.add_member(creator.to_string());
        rooms.insert(room_id.to_string(), room);

        info!(room_id = %room_id, creator = %creator, "Room created");
        Ok(CreateRoomResult::Created)
    }

    #[instrument(skip(self))]
    async fn exists(&self, room_id: &str) -> Result<bool, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.contains_key(room_id))
    }

    #[instrument(skip(self))]
    async fn members(&self, room_id: &str) -> Result<Vec<String>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn try_join_room(
        &self,
        room_id: &str,
        conn_id: &str,
    ) -> Result<JoinRoomResult, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return Ok(JoinRoomResult::RoomNotFound);
            }
        };

        if room.is_full() {
            debug!(room_id = %room_id, member_count = room.member_count(), "Room is full");
            return Ok(JoinRoomResult::RoomFull);
        }

        // Snapshot before the append: these are the peers the joiner must
        // initiate offers to.
        let existing_members = room.members.clone();

        if !room.add_member(conn_id.to_string()) {
            debug!(room_id = %room_id, conn_id = %conn_id, "Connection already in room");
            return Ok(JoinRoomResult::AlreadyMember);
        }

        info!(
            room_id = %room_id,
            conn_id = %conn_id,
            member_count = room.member_count(),
            "Connection joined room"
        );

        Ok(JoinRoomResult::Joined { existing_members })
    }

    #[instrument(skip(self))]
    async fn leave_room(
        &self,
        room_id: &str,
        conn_id: &str,
    ) -> Result<LeaveRoomResult, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return Ok(LeaveRoomResult::RoomNotFound);
            }
        };

        if !room.has_member(conn_id) {
            debug!(room_id = %room_id, conn_id = %conn_id, "Connection not in room");
            return Ok(LeaveRoomResult::NotAMember);
        }

        room.remove_member(conn_id);

        if room.members.is_empty() {
            rooms.remove(room_id);
            info!(room_id = %room_id, "Room deleted (empty)");
            return Ok(LeaveRoomResult::RoomDeleted);
        }

        let remaining_members = room.members.clone();

        info!(
            room_id = %room_id,
            conn_id = %conn_id,
            member_count = remaining_members.len(),
            "Connection left room"
        );

        Ok(LeaveRoomResult::Left { remaining_members })
    }
}
