use std::sync::Arc;
use tokio::sync::mpsc;

use huddle::{
    room::{shared_registry, InMemorySessionRegistry, SessionRegistry, SharedRegistry},
    websockets::{Connection, ConnectionManager, InMemoryConnectionManager},
    RoomSessionHandler,
};

use super::mocks::{ScriptedSocket, SequentialRoomIds};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// One process worth of shared state: registry, transport and id source
pub struct TestSetup {
    pub registry: SharedRegistry,
    pub connection_manager: Arc<InMemoryConnectionManager>,
    pub room_ids: Arc<SequentialRoomIds>,
}

/// A connected client: its session handler plus the frames sent to it
pub struct TestClient {
    pub handler: RoomSessionHandler,
    pub receiver: mpsc::UnboundedReceiver<String>,
    pub connection_manager: Arc<InMemoryConnectionManager>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self {
            registry: shared_registry(InMemorySessionRegistry::new()),
            connection_manager: Arc::new(InMemoryConnectionManager::new()),
            room_ids: Arc::new(SequentialRoomIds::new()),
        }
    }

    /// Register a connection with the transport and bind a session handler to it
    pub async fn connect(&self, connection_id: &str) -> TestClient {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connection_manager
            .add_connection(connection_id.to_string(), sender)
            .await;

        let handler = RoomSessionHandler::new(
            connection_id.to_string(),
            self.registry.clone(),
            self.connection_manager.clone(),
            self.room_ids.clone(),
        );

        TestClient {
            handler,
            receiver,
            connection_manager: self.connection_manager.clone(),
        }
    }

    /// Drive a whole socket lifetime the way the /ws endpoint does:
    /// register, pump the scripted frames through a session, then tear down
    pub async fn run_connection(&self, connection_id: &str, frames: &[&str]) {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connection_manager
            .add_connection(connection_id.to_string(), sender)
            .await;

        let session = RoomSessionHandler::new(
            connection_id.to_string(),
            self.registry.clone(),
            self.connection_manager.clone(),
            self.room_ids.clone(),
        );
        let connection = Connection::new(
            connection_id.to_string(),
            Box::new(ScriptedSocket::new(frames)),
            receiver,
            Box::new(session),
        );

        connection.run().await.unwrap();
        self.connection_manager
            .remove_connection(connection_id)
            .await;
    }

    pub async fn participant_count(&self, room_id: &str) -> usize {
        self.registry
            .lock()
            .await
            .snapshot_participants(room_id)
            .len()
    }

    pub async fn transcript_len(&self, room_id: &str) -> usize {
        self.registry.lock().await.snapshot_messages(room_id).len()
    }
}
