//! Error types for the room layer.

use tyche_protocol::Jid;

/// Errors that can occur during join and leave.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The address has no room part, e.g. `rooms.example.net`.
    #[error("{0} is not a room address")]
    InvalidRoom(Jid),

    /// The bot is already in this room.
    #[error("already joined {0}")]
    AlreadyJoined(Jid),

    /// A join request for this room is still waiting for an answer.
    #[error("already joining {0}")]
    AlreadyJoining(Jid),

    /// The bot has no membership in this room.
    #[error("not joined to {0}")]
    NotJoined(Jid),
}
