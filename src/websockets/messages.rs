use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-to-server signaling events
///
/// Wire format is a tagged JSON object: `{"event": "...", "data": ...}`.
/// Room events carry the bare room id as `data`; relay events carry an
/// object with the target connection id and the opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    Create(String),
    Join(String),
    Offer { target: String, sdp: Value },
    Answer { target: String, sdp: Value },
    IceCandidate { target: String, candidate: Value },
    LeaveRoom(String),
}

/// Server-to-client signaling events
///
/// Relayed offers/answers carry the sender id as `caller`, ICE candidates as
/// `from`. Clients depend on that asymmetry, so it is part of the wire
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: String },

    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: String },

    /// Human-readable failure reported to the caller only
    Error(String),

    /// Member ids already in the room, sent to a joiner so it can initiate
    /// offers to each of them
    AllUsers(Vec<String>),

    /// Sent to existing members so they expect an incoming offer
    UserJoined(String),

    /// Sent to remaining members after a leave or disconnect
    UserLeft(String),

    Offer { sdp: Value, caller: String },
    Answer { sdp: Value, caller: String },
    IceCandidate { candidate: Value, from: String },
}
