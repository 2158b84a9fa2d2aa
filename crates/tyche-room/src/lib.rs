//! Room membership for Tyche.
//!
//! Joining a multi-user room is a small conversation with the server:
//! the bot announces the nickname it wants, and the room answers with
//! either a presence (welcome in) or a conflict error (nickname taken).
//! On conflict the bot appends a suffix and asks again, until it gets in.
//!
//! # Key types
//!
//! - [`JoinState`]: per-room state machine
//! - [`RoomManager`]: drives joins and leaves, remembers assigned
//!   nicknames, recognises the bot's own echoed messages
//! - [`RoomConfig`]: collision suffix and farewell text

mod config;
mod error;
mod manager;

pub use config::{JoinState, RoomConfig};
pub use error::RoomError;
pub use manager::{JoinOutcome, RoomManager};
