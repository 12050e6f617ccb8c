//! Test assertion helpers for frames received by clients
#![allow(dead_code)] // Test utilities may not all be used in every test

use huddle::websockets::ServerEvent;

use super::setup::TestClient;

// ============================================================================
// Assertion Helpers
// ============================================================================

impl TestClient {
    /// Drain every frame received so far
    pub fn received(&mut self) -> Vec<ServerEvent> {
        let mut events = vec![];
        while let Ok(frame) = self.receiver.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }

    /// Consume the next frame, failing if there is none
    pub fn next_event(&mut self) -> ServerEvent {
        let frame = self
            .receiver
            .try_recv()
            .expect("client should have received a frame");
        serde_json::from_str(&frame).unwrap()
    }

    pub fn assert_silent(&mut self) {
        let events = self.received();
        assert!(
            events.is_empty(),
            "{} should not have received anything, got {:?}",
            self.handler.connection_id(),
            events
        );
    }
}

/// Sorted peer ids from a `get-users` event
pub fn participant_ids(event: &ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::GetUsers(payload) => {
            let mut ids: Vec<String> = payload.participants.keys().cloned().collect();
            ids.sort();
            ids
        }
        other => panic!("expected get-users, got {:?}", other),
    }
}

/// Display names from a `get-users` event, sorted by peer id
pub fn participant_names(event: &ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::GetUsers(payload) => {
            let mut participants: Vec<_> = payload.participants.values().collect();
            participants.sort_by(|a, b| a.peer_id.cmp(&b.peer_id));
            participants.iter().map(|p| p.user_name.clone()).collect()
        }
        other => panic!("expected get-users, got {:?}", other),
    }
}
