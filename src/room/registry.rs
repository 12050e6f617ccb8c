use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::models::{ChatMessage, Participant, Participants};

/// Registry shared by every connection handler.
///
/// Handlers hold the lock for the whole of one inbound event, so events
/// from different connections never interleave.
pub type SharedRegistry = Arc<Mutex<dyn SessionRegistry>>;

/// Wraps a registry implementation for sharing between handlers
pub fn shared_registry(registry: impl SessionRegistry + 'static) -> SharedRegistry {
    Arc::new(Mutex::new(registry))
}

/// Storage for room membership and chat transcripts.
///
/// Nothing here fails on a missing room or participant: lookups come back
/// empty, removals and renames become no-ops, and writes create what they
/// need. Clients may deliver join/leave/message events in any order.
pub trait SessionRegistry: Send {
    /// Creates an empty participant set for the room if none exists
    fn ensure_room(&mut self, room_id: &str);

    /// Creates an empty transcript for the room if none exists
    fn ensure_transcript(&mut self, room_id: &str);

    /// Inserts or overwrites the participant entry for `peer_id`
    fn add_participant(&mut self, room_id: &str, peer_id: &str, user_name: &str);

    /// Removes the participant, returning it if it was present
    fn remove_participant(&mut self, room_id: &str, peer_id: &str) -> Option<Participant>;

    /// Changes a participant's display name. Returns false when there is
    /// no such participant.
    fn rename_participant(&mut self, room_id: &str, peer_id: &str, user_name: &str) -> bool;

    /// Appends to the room's transcript, creating it if needed
    fn append_message(&mut self, room_id: &str, message: ChatMessage);

    fn snapshot_participants(&self, room_id: &str) -> Participants;

    fn snapshot_messages(&self, room_id: &str) -> Vec<ChatMessage>;

    fn contains_room(&self, room_id: &str) -> bool;

    fn room_count(&self) -> usize;
}

/// Process-local registry. Rooms are never deleted, even once empty.
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    rooms: HashMap<String, Participants>,
    transcripts: HashMap<String, Vec<ChatMessage>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn ensure_room(&mut self, room_id: &str) {
        if !self.rooms.contains_key(room_id) {
            debug!(room_id = %room_id, "Creating room in memory");
            self.rooms.insert(room_id.to_string(), Participants::new());
        }
    }

    fn ensure_transcript(&mut self, room_id: &str) {
        self.transcripts.entry(room_id.to_string()).or_default();
    }

    #[instrument(skip(self))]
    fn add_participant(&mut self, room_id: &str, peer_id: &str, user_name: &str) {
        let participants = self.rooms.entry(room_id.to_string()).or_default();
        let previous = participants.insert(
            peer_id.to_string(),
            Participant::new(peer_id, user_name),
        );

        debug!(
            room_id = %room_id,
            peer_id = %peer_id,
            replaced = previous.is_some(),
            participant_count = participants.len(),
            "Participant stored"
        );
    }

    #[instrument(skip(self))]
    fn remove_participant(&mut self, room_id: &str, peer_id: &str) -> Option<Participant> {
        let removed = self
            .rooms
            .get_mut(room_id)
            .and_then(|participants| participants.remove(peer_id));

        if removed.is_none() {
            debug!(room_id = %room_id, peer_id = %peer_id, "Participant not in room");
        }

        removed
    }

    #[instrument(skip(self))]
    fn rename_participant(&mut self, room_id: &str, peer_id: &str, user_name: &str) -> bool {
        match self
            .rooms
            .get_mut(room_id)
            .and_then(|participants| participants.get_mut(peer_id))
        {
            Some(participant) => {
                participant.user_name = user_name.to_string();
                true
            }
            None => {
                debug!(room_id = %room_id, peer_id = %peer_id, "Rename ignored, no such participant");
                false
            }
        }
    }

    fn append_message(&mut self, room_id: &str, message: ChatMessage) {
        let transcript = self.transcripts.entry(room_id.to_string()).or_default();
        transcript.push(message);
        debug!(room_id = %room_id, transcript_len = transcript.len(), "Message appended");
    }

    fn snapshot_participants(&self, room_id: &str) -> Participants {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    fn snapshot_messages(&self, room_id: &str) -> Vec<ChatMessage> {
        self.transcripts.get(room_id).cloned().unwrap_or_default()
    }

    fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
