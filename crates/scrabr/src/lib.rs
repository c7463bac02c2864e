//! # Scrabr
//!
//! A multiplayer word-board game server. Players meet in rooms identified by
//! a short code, take turns placing letter tiles on a shared 15×15 board and
//! score the words they form.
//!
//! The server is authoritative: clients send intents over a WebSocket, each
//! room actor validates and applies them, and every player receives their
//! own view of the room after each change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrabr::prelude::*;
//!
//! # async fn start() -> Result<(), ScrabrError> {
//! let words = WordList::from_words(["casa", "mar", "sol"]);
//! let server = ScrabrServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(words)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ScrabrError;
pub use server::{ScrabrServer, ScrabrServerBuilder};

/// Everything needed to embed a server or talk to one.
pub mod prelude {
    pub use crate::{ScrabrError, ScrabrServer, ScrabrServerBuilder};
    pub use scrabr_protocol::{
        ClientEvent, Codec, Envelope, JsonCodec, PlacedTile, PlayerId, ProtocolError, RoomCode,
        RoomPhase, RoomView, ServerEvent,
    };
    pub use scrabr_room::{RoomConfig, RoomError};
    pub use scrabr_rules::{DictionaryOracle, PlayError, Variant, WordList};
}
