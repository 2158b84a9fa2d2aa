//! Conversation tracking for Tyche.
//!
//! Every counterpart the bot hears from, whether a single user or a
//! whole room, gets one [`Conversation`]. The [`ConversationRegistry`]
//! creates them lazily on first contact and hands each one a clone of the
//! same outgoing channel, so conversation logic never touches the
//! connection directly: replies go into the channel and the bot's run
//! loop forwards them.
//!
//! # How it fits in the stack
//!
//! ```text
//! Bot (above)           ← classifies inbound stanzas, picks the conversation
//!     ↕
//! Conversations (this)  ← one reply channel per counterpart
//!     ↕
//! Protocol (below)      ← Jid, Message, Presence, Stanza
//! ```

mod conversation;
mod error;
mod registry;

pub use conversation::{Conversation, ConversationConfig, ConversationKind};
pub use error::ConversationError;
pub use registry::ConversationRegistry;
