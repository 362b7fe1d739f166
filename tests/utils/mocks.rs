use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use sigrelay::{ConnectionManager, ServerMessage};

// ============================================================================
// Mock Infrastructure
// ============================================================================

#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, Vec<String>>>>,
    connected_peers: Arc<RwLock<Vec<String>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            connected_peers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add_connected_peer(&self, conn_id: &str) {
        self.connected_peers.write().await.push(conn_id.to_string());
    }

    /// Everything sent to a connection, in delivery order, parsed back into
    /// typed events
    pub async fn messages_for(&self, conn_id: &str) -> Vec<ServerMessage> {
        self.sent_messages
            .read()
            .await
            .get(conn_id)
            .cloned()
            .unwrap_or_default()
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("mock recorded invalid JSON"))
            .collect()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, conn_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.add_connected_peer(&conn_id).await;
    }

    async fn remove_connection(&self, conn_id: &str) {
        self.connected_peers.write().await.retain(|p| p != conn_id);
    }

    async fn is_connected(&self, conn_id: &str) -> bool {
        self.connected_peers
            .read()
            .await
            .iter()
            .any(|p| p == conn_id)
    }

    async fn send_to_peer(&self, conn_id: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(conn_id.to_string())
            .or_default()
            .push(message.to_string());
    }

    async fn send_to_peers(&self, conn_ids: &[String], message: &str) {
        for conn_id in conn_ids {
            self.send_to_peer(conn_id, message).await;
        }
    }
}
