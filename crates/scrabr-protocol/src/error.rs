//! Error types for the protocol layer.

/// Errors raised while encoding, decoding or interpreting wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes are not valid JSON for the expected event.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code that is not six characters of `0-9A-Z`.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),
}
