//! Wire protocol for Tyche.
//!
//! - **Addresses** ([`Jid`]): `node@domain/resource` chat identities
//! - **Stanzas** ([`Message`], [`Presence`], [`Stanza`]): chat traffic
//! - **Frames** ([`Frame`]): what actually crosses the connection,
//!   including the authentication exchange
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): frames to bytes and back
//!
//! ```text
//! Transport (bytes) → Protocol (Frame / Stanza) → Bot (conversations, commands)
//! ```

mod codec;
mod error;
mod jid;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use jid::Jid;
pub use types::{
    CONFLICT_CODE, Element, Frame, Message, MessageKind, NS_CONFERENCE, NS_MUC_USER,
    Presence, PresenceKind, Stanza,
};
