pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{participant_names, participant_ids};
#[allow(unused_imports)]
pub use mocks::{ScriptedSocket, SequentialRoomIds};
#[allow(unused_imports)]
pub use setup::{TestClient, TestSetup};
