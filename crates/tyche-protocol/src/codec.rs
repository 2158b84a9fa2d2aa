//! Codec trait and implementations for (de)serializing frames.
//!
//! The bot only ever asks a [`Codec`] to turn a [`Frame`](crate::Frame)
//! into bytes and back; which format the gateway speaks is a choice made
//! once, when the bot is built.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON, one frame per WebSocket text message.
///
/// ```rust
/// use tyche_protocol::{Codec, Frame, JsonCodec};
///
/// let codec = JsonCodec;
/// let auth = Frame::Auth {
///     account: "tyche@example.net".into(),
///     secret: "hunter2".into(),
///     resource: "Tyche".into(),
/// };
/// let bytes = codec.encode(&auth).unwrap();
/// let back: Frame = codec.decode(&bytes).unwrap();
/// assert_eq!(auth, back);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
