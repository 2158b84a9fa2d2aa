//! Unified error type for the Tyche framework, plus the two errors the
//! framework itself raises: bad route patterns and failed commands.

use std::fmt;

use tyche_conversation::ConversationError;
use tyche_dice::DiceError;
use tyche_protocol::ProtocolError;
use tyche_room::RoomError;
use tyche_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TycheError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, bad address).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A conversation-level error (reply channel gone).
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    /// A room-level error (not joined, already joining).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A dice error surfaced outside a command.
    #[error(transparent)]
    Dice(#[from] DiceError),

    /// A command pattern failed to compile.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// The server refused the credentials, or hung up before answering.
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

/// Errors from building the command table.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The pattern is not a valid regular expression.
    #[error("invalid command pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a command produced no normal reply.
///
/// Its `Display` is exactly the line sent back to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The arguments didn't fit the command's grammar.
    #[error("Bad value: {0}")]
    Malformed(String),

    /// An alias or account lookup came up empty.
    #[error("Who's that?")]
    UnknownEntity,

    /// The request was understood and turned down; the text is the whole
    /// reply.
    #[error("{0}")]
    Refused(String),

    /// Anything else that went wrong inside a handler.
    #[error("Bad command: {0}")]
    Fault(String),
}

impl CommandError {
    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self::Malformed(detail.to_string())
    }

    pub fn refused(reply: impl Into<String>) -> Self {
        Self::Refused(reply.into())
    }

    pub fn fault(detail: impl fmt::Display) -> Self {
        Self::Fault(detail.to_string())
    }
}

impl From<DiceError> for CommandError {
    fn from(err: DiceError) -> Self {
        match err {
            DiceError::StepOutOfRange(_) => Self::Refused(err.to_string()),
            other => Self::Malformed(other.to_string()),
        }
    }
}

impl From<RoomError> for CommandError {
    fn from(err: RoomError) -> Self {
        Self::fault(err)
    }
}

impl From<ConversationError> for CommandError {
    fn from(err: ConversationError) -> Self {
        Self::fault(err)
    }
}
