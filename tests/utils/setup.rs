use std::sync::Arc;

use sigrelay::{
    ClientMessage, ConnectionManager, ConnectionRegistry, InMemoryConnectionRegistry,
    InMemoryRoomRepository, MembershipCoordinator, MessageHandler, RelayRouter, RoomRepository,
    ServerMessage, SignalingReceiveHandler,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub rooms: Arc<InMemoryRoomRepository>,
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub coordinator: Arc<MembershipCoordinator>,
    pub input_handler: SignalingReceiveHandler,
}

pub struct TestSetupBuilder {
    peers: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { peers: vec![] }
    }

    pub fn with_peers(mut self, peers: Vec<&str>) -> Self {
        self.peers = peers.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub async fn build(self) -> TestSetup {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        let coordinator = Arc::new(MembershipCoordinator::new(
            rooms.clone(),
            registry.clone(),
            mock_conn_manager.clone(),
        ));
        let relay = Arc::new(RelayRouter::new(mock_conn_manager.clone()));

        let input_handler = SignalingReceiveHandler::new(coordinator.clone(), relay);

        // Connect peers: registered plus reachable for delivery
        for peer in &self.peers {
            registry.register(peer).await.unwrap();
            mock_conn_manager.add_connected_peer(peer).await;
        }

        TestSetup {
            mock_conn_manager,
            rooms,
            registry,
            coordinator,
            input_handler,
        }
    }
}

impl TestSetup {
    /// Feed an inbound event through the decode-and-dispatch boundary, the
    /// way a frame off the socket would arrive
    pub async fn send(&self, conn_id: &str, message: ClientMessage) {
        let raw = serde_json::to_string(&message).unwrap();
        self.input_handler.handle_message(conn_id, raw).await;
    }

    /// Feed a raw text frame (for malformed-input tests)
    pub async fn send_raw(&self, conn_id: &str, raw: &str) {
        self.input_handler.handle_message(conn_id, raw.to_string()).await;
    }

    /// Simulate a transport-level disconnect for a peer
    pub async fn disconnect(&self, conn_id: &str) {
        self.mock_conn_manager.remove_connection(conn_id).await;
        self.coordinator.handle_disconnect(conn_id).await.unwrap();
    }

    pub async fn messages_for(&self, conn_id: &str) -> Vec<ServerMessage> {
        self.mock_conn_manager.messages_for(conn_id).await
    }

    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    pub async fn members(&self, room_id: &str) -> Vec<String> {
        self.rooms.members(room_id).await.unwrap()
    }

    pub async fn room_exists(&self, room_id: &str) -> bool {
        self.rooms.exists(room_id).await.unwrap()
    }
}
