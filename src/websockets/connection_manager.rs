use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Outbound delivery map: connection id -> sender feeding that connection's
/// socket pump. Sends to unknown ids are silent no-ops, which is what the
/// relay path relies on for stale targets.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, conn_id: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, conn_id: &str);

    async fn is_connected(&self, conn_id: &str) -> bool;

    async fn send_to_peer(&self, conn_id: &str, message: &str);

    async fn send_to_peers(&self, conn_ids: &[String], message: &str);
}

pub struct InMemoryConnectionManager {
    // conn_id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, conn_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(conn_id, sender);
    }

    async fn remove_connection(&self, conn_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(conn_id);
    }

    async fn is_connected(&self, conn_id: &str) -> bool {
        let connections = self.connections.read().await;
        connections.contains_key(conn_id)
    }

    async fn send_to_peer(&self, conn_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(conn_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_peers(&self, conn_ids: &[String], message: &str) {
        let connections = self.connections.read().await;
        for conn_id in conn_ids {
            if let Some(sender) = connections.get(conn_id) {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
