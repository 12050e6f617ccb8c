use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Transport capability used by session handlers.
///
/// Connections are addressed by their transport id; rooms are broadcast
/// groups that connections subscribe to. All sends are fire-and-forget:
/// a frame for a connection that is already gone is dropped.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>);

    /// Drops the connection and all of its group subscriptions
    async fn remove_connection(&self, connection_id: &str);

    async fn subscribe(&self, connection_id: &str, room_id: &str);

    async fn unsubscribe(&self, connection_id: &str, room_id: &str);

    async fn send_to_connection(&self, connection_id: &str, message: &str);

    /// Sends to every connection subscribed to `room_id` except `except_connection_id`
    async fn send_to_room_except(&self, room_id: &str, except_connection_id: &str, message: &str);
}

#[derive(Default)]
struct Connections {
    // connection id -> sender
    senders: HashMap<String, mpsc::UnboundedSender<String>>,
    // room id -> subscribed connection ids
    groups: HashMap<String, HashSet<String>>,
}

pub struct InMemoryConnectionManager {
    connections: Arc<RwLock<Connections>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(Connections::default())),
        }
    }

    /// Number of connections subscribed to a room
    pub async fn group_size(&self, room_id: &str) -> usize {
        let connections = self.connections.read().await;
        connections.groups.get(room_id).map_or(0, HashSet::len)
    }

    pub async fn count_connections(&self) -> usize {
        self.connections.read().await.senders.len()
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.senders.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &str) {
        let mut connections = self.connections.write().await;
        connections.senders.remove(connection_id);
        for members in connections.groups.values_mut() {
            members.remove(connection_id);
        }
        connections.groups.retain(|_, members| !members.is_empty());
    }

    async fn subscribe(&self, connection_id: &str, room_id: &str) {
        let mut connections = self.connections.write().await;
        connections
            .groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    async fn unsubscribe(&self, connection_id: &str, room_id: &str) {
        let mut connections = self.connections.write().await;
        if let Some(members) = connections.groups.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                connections.groups.remove(room_id);
            }
        }
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.senders.get(connection_id) {
            let _ = sender.send(message.to_string());
        }
    }

    async fn send_to_room_except(&self, room_id: &str, except_connection_id: &str, message: &str) {
        let connections = self.connections.read().await;
        let Some(members) = connections.groups.get(room_id) else {
            debug!(room_id = %room_id, "No subscribers for room");
            return;
        };

        for connection_id in members.iter().filter(|id| *id != except_connection_id) {
            if let Some(sender) = connections.senders.get(connection_id) {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
