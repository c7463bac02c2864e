//! Unified error type for the Scrabr server.

use scrabr_protocol::ProtocolError;
use scrabr_room::RoomError;
use tokio_tungstenite::tungstenite;

/// Top-level error that wraps the errors of every layer.
///
/// Each variant converts with `?` from the layer's own error.
#[derive(Debug, thiserror::Error)]
pub enum ScrabrError {
    /// Binding the listener or loading the word list failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The WebSocket handshake or a frame read/write failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Room(#[from] RoomError),
}
