use uuid::Uuid;

/// Trait for generating room identities
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs, so ids are never reused within a process
pub struct UuidRoomIdGenerator;

impl UuidRoomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UuidRoomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomIdGenerator for UuidRoomIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
