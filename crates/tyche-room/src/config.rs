//! Room configuration and the per-room join state machine.

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for joining and leaving rooms.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Appended to the nickname each time the room reports a collision.
    pub collision_suffix: char,

    /// Status text sent with the unavailable presence on leave.
    pub farewell: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            collision_suffix: '_',
            farewell: "So long, and thanks for all the dice?".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// JoinState
// ---------------------------------------------------------------------------

/// Where the bot stands with one room.
///
/// ```text
///          request_join(nick)
///   Idle ─────────────────────→ AwaitingResponse{nick}
///                                 │          │
///                 conflict (409)  │          │ any other presence
///                                 ▼          ▼
///             AwaitingResponse{nick + '_'}  Joined{nick}
///                                              │
///                                   leave()    ▼
///                                             Idle
/// ```
///
/// Only the next presence from the room decides a pending join, so a
/// request and its answer are never reordered within one room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JoinState {
    /// Not in the room and not trying to be.
    #[default]
    Idle,

    /// A join presence went out with this nickname; waiting for the
    /// room's answer.
    AwaitingResponse { nickname: String },

    /// In the room under this nickname.
    Joined { nickname: String },
}

impl JoinState {
    /// Returns `true` once the room has accepted the bot.
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }

    /// Returns `true` while a join request is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AwaitingResponse { .. })
    }

    /// The nickname in play, requested or assigned.
    pub fn nickname(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::AwaitingResponse { nickname } | Self::Joined { nickname } => Some(nickname),
        }
    }
}

impl std::fmt::Display for JoinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingResponse { nickname } => write!(f, "AwaitingResponse({nickname})"),
            Self::Joined { nickname } => write!(f, "Joined({nickname})"),
        }
    }
}
