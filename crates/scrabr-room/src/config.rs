//! Room configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every room a manager creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Players needed before a game can start.
    pub min_players: usize,

    /// Roster cap. Joins beyond this are refused.
    pub max_players: usize,

    /// Capacity of each room actor's command channel. Senders wait when
    /// it is full.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
            command_buffer: 64,
        }
    }
}
