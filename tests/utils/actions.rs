use huddle::{
    room::ChatMessage,
    websockets::{
        messages::{
            ChangeNamePayload, JoinRoomPayload, RoomCreatedPayload, RoomPeerPayload,
            SendMessagePayload,
        },
        ClientEvent, ConnectionManager, MessageHandler, ServerEvent,
    },
};

use super::setup::TestClient;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestClient {
    /// Send a client event over the wire format
    pub async fn send(&mut self, event: ClientEvent) {
        let frame = serde_json::to_string(&event).unwrap();
        self.send_raw(&frame).await;
    }

    pub async fn send_raw(&mut self, frame: &str) {
        self.handler.handle_message(frame.to_string()).await;
    }

    /// Create a room and return its id from the `room-created` reply
    pub async fn create_room(&mut self) -> String {
        self.send(ClientEvent::CreateRoom).await;
        match self.next_event() {
            ServerEvent::RoomCreated(RoomCreatedPayload { room_id }) => room_id,
            other => panic!("expected room-created, got {:?}", other),
        }
    }

    pub async fn join(&mut self, room_id: &str, peer_id: &str, user_name: &str) {
        self.send(ClientEvent::JoinRoom(JoinRoomPayload {
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            user_name: user_name.to_string(),
        }))
        .await;
    }

    pub async fn leave(&mut self, room_id: &str, peer_id: &str) {
        self.send(ClientEvent::LeaveRoom(room_peer(room_id, peer_id)))
            .await;
    }

    pub async fn start_sharing(&mut self, room_id: &str, peer_id: &str) {
        self.send(ClientEvent::StartSharing(room_peer(room_id, peer_id)))
            .await;
    }

    pub async fn stop_sharing(&mut self, room_id: &str, peer_id: &str) {
        self.send(ClientEvent::StopSharing(room_peer(room_id, peer_id)))
            .await;
    }

    pub async fn send_chat(&mut self, room_id: &str, message: ChatMessage) {
        self.send(ClientEvent::SendMessage(SendMessagePayload {
            room_id: room_id.to_string(),
            message,
        }))
        .await;
    }

    pub async fn change_name(&mut self, room_id: &str, peer_id: &str, user_name: &str) {
        self.send(ClientEvent::ChangeName(ChangeNamePayload {
            room_id: room_id.to_string(),
            peer_id: peer_id.to_string(),
            user_name: user_name.to_string(),
        }))
        .await;
    }

    /// Close the connection the way the WebSocket layer does
    pub async fn disconnect(mut self) {
        self.handler.handle_disconnect().await;
        self.connection_manager
            .remove_connection(self.handler.connection_id())
            .await;
    }
}

fn room_peer(room_id: &str, peer_id: &str) -> RoomPeerPayload {
    RoomPeerPayload {
        room_id: room_id.to_string(),
        peer_id: peer_id.to_string(),
    }
}
