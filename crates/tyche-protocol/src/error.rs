//! Error types for the protocol layer.

/// Errors that can occur while parsing addresses or (de)serializing
/// frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or an
    /// unknown frame type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A chat address could not be parsed.
    #[error("invalid address {0:?}: {1}")]
    InvalidJid(String, &'static str),

    /// The frame decoded but makes no sense at this point of the
    /// conversation with the server (e.g. a stanza before auth).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
