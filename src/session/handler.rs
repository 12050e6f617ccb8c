use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::room::{Participant, RoomIdGenerator, SessionRegistry, SharedRegistry};
use crate::websockets::messages::{
    ChangeNamePayload, ClientEvent, JoinRoomPayload, RoomCreatedPayload, RoomPeerPayload,
    SendMessagePayload, ServerEvent, UsersPayload,
};
use crate::websockets::{ConnectionManager, MessageHandler};

/// The room/peer pair a connection is currently joined as.
/// Disconnect cleanup always targets this pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBinding {
    pub room_id: String,
    pub peer_id: String,
}

impl RoomBinding {
    pub fn new(room_id: impl Into<String>, peer_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            peer_id: peer_id.into(),
        }
    }

    fn matches(&self, room_id: &str, peer_id: &str) -> bool {
        self.room_id == room_id && self.peer_id == peer_id
    }
}

/// Session state machine for one connection.
///
/// Starts unbound, becomes bound on `join-room`, and goes back to unbound
/// on leave. Every event locks the shared registry for its full duration,
/// emissions included, so room state and what clients observe stay in step.
pub struct RoomSessionHandler {
    connection_id: String,
    registry: SharedRegistry,
    connection_manager: Arc<dyn ConnectionManager>,
    room_ids: Arc<dyn RoomIdGenerator>,
    binding: Option<RoomBinding>,
}

impl RoomSessionHandler {
    pub fn new(
        connection_id: String,
        registry: SharedRegistry,
        connection_manager: Arc<dyn ConnectionManager>,
        room_ids: Arc<dyn RoomIdGenerator>,
    ) -> Self {
        Self {
            connection_id,
            registry,
            connection_manager,
            room_ids,
            binding: None,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn binding(&self) -> Option<&RoomBinding> {
        self.binding.as_ref()
    }

    /// Routes a parsed client event to its handler
    pub async fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::CreateRoom => self.create_room().await,
            ClientEvent::JoinRoom(payload) => self.join_room(payload).await,
            ClientEvent::LeaveRoom(payload) => self.leave_room(payload).await,
            ClientEvent::StartSharing(payload) => self.start_sharing(payload).await,
            ClientEvent::StopSharing(payload) => self.stop_sharing(payload).await,
            ClientEvent::SendMessage(payload) => self.send_message(payload).await,
            ClientEvent::ChangeName(payload) => self.change_name(payload).await,
        }
    }

    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    pub async fn create_room(&mut self) {
        let room_id = self.room_ids.generate();
        let mut registry = self.registry.lock().await;
        registry.ensure_room(&room_id);

        info!(room_id = %room_id, "Room created");

        self.emit_to_caller(ServerEvent::RoomCreated(RoomCreatedPayload { room_id }))
            .await;
    }

    #[instrument(skip(self, payload), fields(connection_id = %self.connection_id))]
    pub async fn join_room(&mut self, payload: JoinRoomPayload) {
        let JoinRoomPayload {
            room_id,
            peer_id,
            user_name,
        } = payload;
        let next = RoomBinding::new(room_id.clone(), peer_id.clone());
        let mut registry = self.registry.lock().await;

        if let Some(previous) = self.binding.as_ref().filter(|binding| **binding != next) {
            info!(
                previous_room_id = %previous.room_id,
                previous_peer_id = %previous.peer_id,
                "Leaving previous room before join"
            );
            self.leave_locked(&mut *registry, &previous.room_id, &previous.peer_id)
                .await;
        }

        registry.ensure_room(&room_id);
        registry.ensure_transcript(&room_id);

        // The joiner gets the transcript before it can observe any new message
        let transcript = registry.snapshot_messages(&room_id);
        self.emit_to_caller(ServerEvent::GetMessages(transcript)).await;

        registry.add_participant(&room_id, &peer_id, &user_name);
        self.connection_manager
            .subscribe(&self.connection_id, &room_id)
            .await;

        info!(
            room_id = %room_id,
            peer_id = %peer_id,
            user_name = %user_name,
            "Participant joined room"
        );

        self.emit_to_room(
            &room_id,
            ServerEvent::UserJoined(Participant::new(peer_id, user_name)),
        )
        .await;

        let participants = registry.snapshot_participants(&room_id);
        self.emit_to_caller(ServerEvent::GetUsers(UsersPayload {
            room_id,
            participants,
        }))
        .await;

        self.binding = Some(next);
    }

    #[instrument(skip(self, payload), fields(connection_id = %self.connection_id))]
    pub async fn leave_room(&mut self, payload: RoomPeerPayload) {
        let mut registry = self.registry.lock().await;
        self.leave_locked(&mut *registry, &payload.room_id, &payload.peer_id)
            .await;

        if self
            .binding
            .as_ref()
            .is_some_and(|binding| binding.matches(&payload.room_id, &payload.peer_id))
        {
            self.binding = None;
        }
    }

    /// Cleans up the current binding, if any. Terminal for the connection.
    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    pub async fn disconnect(&mut self) {
        let Some(binding) = self.binding.take() else {
            debug!("Disconnect without a joined room");
            return;
        };

        let mut registry = self.registry.lock().await;
        self.leave_locked(&mut *registry, &binding.room_id, &binding.peer_id)
            .await;

        info!(
            room_id = %binding.room_id,
            peer_id = %binding.peer_id,
            "Connection disconnected from room"
        );
    }

    pub async fn start_sharing(&mut self, payload: RoomPeerPayload) {
        let _registry = self.registry.lock().await;
        debug!(room_id = %payload.room_id, peer_id = %payload.peer_id, "Screen share started");

        self.emit_to_room(
            &payload.room_id,
            ServerEvent::UserStartedSharing(payload.peer_id.clone()),
        )
        .await;
    }

    pub async fn stop_sharing(&mut self, payload: RoomPeerPayload) {
        let _registry = self.registry.lock().await;
        debug!(room_id = %payload.room_id, peer_id = %payload.peer_id, "Screen share stopped");

        self.emit_to_room(
            &payload.room_id,
            ServerEvent::UserStoppedSharing(payload.peer_id.clone()),
        )
        .await;
    }

    #[instrument(skip(self, payload), fields(connection_id = %self.connection_id, room_id = %payload.room_id))]
    pub async fn send_message(&mut self, payload: SendMessagePayload) {
        let SendMessagePayload { room_id, message } = payload;
        let mut registry = self.registry.lock().await;

        registry.append_message(&room_id, message.clone());
        self.emit_to_room(&room_id, ServerEvent::AddMessage(message))
            .await;
    }

    #[instrument(skip(self, payload), fields(connection_id = %self.connection_id, room_id = %payload.room_id))]
    pub async fn change_name(&mut self, payload: ChangeNamePayload) {
        let ChangeNamePayload {
            room_id,
            peer_id,
            user_name,
        } = payload;
        let mut registry = self.registry.lock().await;

        if !registry.rename_participant(&room_id, &peer_id, &user_name) {
            return;
        }

        info!(peer_id = %peer_id, user_name = %user_name, "Participant renamed");
        self.emit_to_room(
            &room_id,
            ServerEvent::NameChanged(Participant::new(peer_id, user_name)),
        )
        .await;
    }

    /// Removes the participant and tells the rest of the room, then drops
    /// this connection's subscription. Caller must hold the registry lock.
    async fn leave_locked(&self, registry: &mut dyn SessionRegistry, room_id: &str, peer_id: &str) {
        if registry.remove_participant(room_id, peer_id).is_some() {
            info!(room_id = %room_id, peer_id = %peer_id, "Participant left room");

            self.emit_to_room(room_id, ServerEvent::UserDisconnected(peer_id.to_string()))
                .await;
            let participants = registry.snapshot_participants(room_id);
            self.emit_to_room(
                room_id,
                ServerEvent::GetUsers(UsersPayload {
                    room_id: room_id.to_string(),
                    participants,
                }),
            )
            .await;
        }

        self.connection_manager
            .unsubscribe(&self.connection_id, room_id)
            .await;
    }

    async fn emit_to_caller(&self, event: ServerEvent) {
        if let Some(frame) = encode(&event) {
            self.connection_manager
                .send_to_connection(&self.connection_id, &frame)
                .await;
        }
    }

    async fn emit_to_room(&self, room_id: &str, event: ServerEvent) {
        if let Some(frame) = encode(&event) {
            self.connection_manager
                .send_to_room_except(room_id, &self.connection_id, &frame)
                .await;
        }
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!(event = event.name(), error = %e, "Failed to serialize server event");
            None
        }
    }
}

#[async_trait]
impl MessageHandler for RoomSessionHandler {
    async fn handle_message(&mut self, message: String) {
        match serde_json::from_str::<ClientEvent>(&message) {
            Ok(event) => {
                debug!(
                    connection_id = %self.connection_id,
                    event = event.name(),
                    "Received client event"
                );
                self.handle_event(event).await;
            }
            Err(e) => {
                warn!(
                    connection_id = %self.connection_id,
                    error = %e,
                    "Failed to parse client event"
                );
            }
        }
    }

    async fn handle_disconnect(&mut self) {
        self.disconnect().await;
    }
}
