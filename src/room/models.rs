use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Participants of a single room keyed by peer id
pub type Participants = HashMap<String, Participant>;

/// A connection's identity inside a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub peer_id: String,
    pub user_name: String,
}

impl Participant {
    pub fn new(peer_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            user_name: user_name.into(),
        }
    }
}

/// Chat message as sent by a client, relayed and stored verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Epoch milliseconds, client supplied
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(content: impl Into<String>, author: Option<String>, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            author,
            timestamp,
        }
    }
}
