// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, SignalingReceiveHandler};
pub use messages::{ClientMessage, ServerMessage};
pub use socket::MessageHandler;

// Internal modules
mod connection_manager;
mod handler;
mod messages;
mod socket;
