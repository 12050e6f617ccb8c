// Per-connection room session state machine
pub use handler::{RoomBinding, RoomSessionHandler};

mod handler;
