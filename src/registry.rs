use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::shared::AppError;

/// Tracks live connection identities and their current room assignment.
///
/// A connection holds at most one room at a time. The room field here is a
/// back-reference for lookup during leave/disconnect; the room's member list
/// is the authoritative membership record.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Adds a new connection with no room. Fails if the id is already
    /// registered, which indicates a transport-layer bug.
    async fn register(&self, conn_id: &str) -> Result<(), AppError>;

    /// Removes the connection entirely. The caller must have already run the
    /// leave transition for any room the connection was in.
    async fn unregister(&self, conn_id: &str);

    /// Returns the room the connection is currently in, if any.
    async fn room_of(&self, conn_id: &str) -> Option<String>;

    /// Updates the connection's room back-reference. No-op for an unknown id
    /// (the connection may already be unregistered).
    async fn set_room(&self, conn_id: &str, room_id: Option<String>);
}

/// In-memory implementation of ConnectionRegistry
pub struct InMemoryConnectionRegistry {
    // conn_id -> current room, if joined
    connections: Mutex<HashMap<String, Option<String>>>,
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, conn_id: &str) -> Result<(), AppError> {
        let mut connections = self.connections.lock().unwrap();
        if connections.contains_key(conn_id) {
            warn!(conn_id = %conn_id, "Connection id already registered");
            return Err(AppError::DuplicateConnection(conn_id.to_string()));
        }
        connections.insert(conn_id.to_string(), None);

        debug!(conn_id = %conn_id, "Connection registered");
        Ok(())
    }

    async fn unregister(&self, conn_id: &str) {
        let mut connections = self.connections.lock().unwrap();
        connections.remove(conn_id);

        debug!(conn_id = %conn_id, "Connection unregistered");
    }

    async fn room_of(&self, conn_id: &str) -> Option<String> {
        let connections = self.connections.lock().unwrap();
        connections.get(conn_id).cloned().flatten()
    }

    async fn set_room(&self, conn_id: &str, room_id: Option<String>) {
        let mut connections = self.connections.lock().unwrap();
        if let Some(entry) = connections.get_mut(conn_id) {
            *entry = room_id;
        } else {
            debug!(conn_id = %conn_id, "Ignoring room update for unknown connection");
        }
    }
}
