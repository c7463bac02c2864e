//! Wire protocol for Scrabr.
//!
//! Clients and the server exchange JSON envelopes over a WebSocket. This
//! crate owns the shapes of those messages and nothing else: it knows what
//! a room view looks like, not how a room produces one.
//!
//! - **Identity** ([`PlayerId`], [`RoomCode`])
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) and their payloads
//! - **Codec** ([`Codec`] trait, [`JsonCodec`])
//! - **Errors** ([`ProtocolError`])
//!
//! ```text
//! WebSocket (text frames) → Codec → Envelope<ClientEvent> → room actor
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, Envelope, ServerEvent};
pub use types::{
    PlacedTile, PlayerId, PlayerView, Recipient, RoomCode, RoomPhase, RoomView, Standing,
    placements_from_wire,
};
