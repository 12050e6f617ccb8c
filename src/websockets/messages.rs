use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::room::{ChatMessage, Participant, Participants};

/// Events sent by clients.
///
/// Frames are JSON objects of the form `{"event": "join-room", "data": {...}}`.
/// Payload-less events omit `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ClientEvent {
    CreateRoom,
    JoinRoom(JoinRoomPayload),
    LeaveRoom(RoomPeerPayload),
    StartSharing(RoomPeerPayload),
    StopSharing(RoomPeerPayload),
    SendMessage(SendMessagePayload),
    ChangeName(ChangeNamePayload),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Events sent to clients, same framing as [`ClientEvent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ServerEvent {
    RoomCreated(RoomCreatedPayload),
    /// Full transcript of the joined room
    GetMessages(Vec<ChatMessage>),
    GetUsers(UsersPayload),
    UserJoined(Participant),
    /// Peer id of the participant that left
    UserDisconnected(String),
    UserStartedSharing(String),
    UserStoppedSharing(String),
    AddMessage(ChatMessage),
    NameChanged(Participant),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
    pub peer_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPeerPayload {
    pub room_id: String,
    pub peer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_id: String,
    pub message: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNamePayload {
    pub room_id: String,
    pub peer_id: String,
    pub user_name: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPayload {
    pub room_id: String,
    pub participants: Participants,
}
