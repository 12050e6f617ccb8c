// Library crate for the huddle room server
// This file exposes the public API for integration tests

pub mod config;
pub mod room;
pub mod router;
pub mod session;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{load_dotenv, ConfigError, ServerConfig};
pub use room::{InMemorySessionRegistry, SessionRegistry, SharedRegistry};
pub use router::build_router;
pub use session::{RoomBinding, RoomSessionHandler};
pub use shared::{AppError, AppState};
pub use websockets::{ClientEvent, ConnectionManager, InMemoryConnectionManager, ServerEvent};
