// Public API - what other modules can use
pub use generators::{RoomIdGenerator, UuidRoomIdGenerator};
pub use models::{ChatMessage, Participant, Participants};
pub use registry::{shared_registry, InMemorySessionRegistry, SessionRegistry, SharedRegistry};

// Internal modules
mod generators;
pub mod models;
pub mod registry;
