use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use huddle::room::RoomIdGenerator;
use huddle::websockets::{SocketError, SocketWrapper};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Predictable room ids: room-1, room-2, ...
#[derive(Default)]
pub struct SequentialRoomIds {
    next: AtomicUsize,
}

impl SequentialRoomIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomIdGenerator for SequentialRoomIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("room-{}", n)
    }
}

/// Socket that replays a fixed list of client frames, then reports a close
pub struct ScriptedSocket {
    inbound: VecDeque<String>,
}

impl ScriptedSocket {
    pub fn new(frames: &[&str]) -> Self {
        Self {
            inbound: frames.iter().map(|frame| frame.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SocketWrapper for ScriptedSocket {
    async fn send_message(&mut self, _message: String) -> Result<(), SocketError> {
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        Ok(self.inbound.pop_front())
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        Ok(())
    }
}
