use std::sync::Arc;
use thiserror::Error;

use crate::config::ConfigError;
use crate::room::{
    shared_registry, InMemorySessionRegistry, RoomIdGenerator, SharedRegistry,
    UuidRoomIdGenerator,
};
use crate::websockets::{ConnectionManager, InMemoryConnectionManager};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub room_ids: Arc<dyn RoomIdGenerator>,
}

impl AppState {
    pub fn new(
        registry: SharedRegistry,
        connection_manager: Arc<dyn ConnectionManager>,
        room_ids: Arc<dyn RoomIdGenerator>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
            room_ids,
        }
    }

    /// Single-process state: in-memory registry and connections, UUID room ids
    pub fn in_memory() -> Self {
        Self::new(
            shared_registry(InMemorySessionRegistry::new()),
            Arc::new(InMemoryConnectionManager::new()),
            Arc::new(UuidRoomIdGenerator::new()),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
