// Library crate for the signaling relay server
// This file exposes the public API for integration tests

pub mod registry;
pub mod room;
pub mod shared;
pub mod signaling;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use registry::{ConnectionRegistry, InMemoryConnectionRegistry};
pub use room::models::{RoomModel, ROOM_CAPACITY};
pub use room::repository::{InMemoryRoomRepository, RoomRepository};
pub use shared::{AppError, AppState};
pub use signaling::{LeaveReason, MembershipCoordinator, RelayRouter};
pub use websockets::{
    websocket_handler, ClientMessage, ConnectionManager, InMemoryConnectionManager,
    MessageHandler, ServerMessage, SignalingReceiveHandler,
};
