//! Room lifecycle for Scrabr.
//!
//! Each room runs as its own Tokio task (actor model). The task owns a
//! [`RoomSession`], the pure state machine for one game room, and applies
//! commands to it strictly one at a time. Nothing outside the task can
//! touch a room's board, bag, racks or scores.
//!
//! # Key types
//!
//! - [`RoomSession`] — roster, turn order, racks, scores and the game cycle
//! - [`RoomManager`] — creates rooms, hands out codes, routes players
//! - [`SharedRooms`] — the manager behind a lock, for connection tasks
//! - [`RoomHandle`] — sends commands to a running room actor
//! - [`RoomConfig`] — player limits and channel sizing

mod config;
mod error;
mod manager;
mod room;
mod session;

pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::{RoomManager, SharedRooms};
pub use room::{PlayerSender, RoomHandle};
pub use scrabr_protocol::RoomPhase;
pub use session::{Outbox, RoomSession};
