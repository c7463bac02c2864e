//! Identity, addressing and view types that travel on the wire.

use std::fmt;

use scrabr_rules::{Board, Letter, PlayError, Placement, Position, Tile, Variant};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A connected player. Assigned by the server per connection.
///
/// Serialized as the bare number, so `PlayerId(42)` is `42` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The short code players type to find a room: six characters of `0-9A-Z`.
///
/// Codes are case-insensitive on input and always held uppercase, so
/// `"ab12cd"` and `"AB12CD"` name the same room. Deserialization goes
/// through [`RoomCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Number of characters in a code.
    pub const LEN: usize = 6;

    /// Characters a code is drawn from.
    pub const ALPHABET: &'static [u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Normalizes and checks a code typed by a player.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() == Self::LEN && code.bytes().all(|b| Self::ALPHABET.contains(&b)) {
            Ok(Self(code))
        } else {
            Err(ProtocolError::InvalidRoomCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> String {
        code.0
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who a server event is addressed to. The room actor pairs each outgoing
/// event with one of these and fans it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One player.
    Player(PlayerId),
    /// Everyone but one player.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if `player` should receive an event sent here.
    pub fn includes(self, player: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(target) => target == player,
            Self::AllExcept(excluded) => excluded != player,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// Where a room is in its game cycle.
///
/// ```text
/// Lobby → InProgress → Finished → Lobby
/// ```
///
/// `Finished` is momentary: the room records the winner and resets to a
/// fresh `Lobby` in the same step, so clients normally only see the other
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomPhase {
    #[default]
    Lobby,
    InProgress,
    Finished,
}

impl RoomPhase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Self::Lobby => Self::InProgress,
            Self::InProgress => Self::Finished,
            Self::Finished => Self::Lobby,
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }

    /// Players may join and toggle ready only in the lobby.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Lobby)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Placed tiles
// ---------------------------------------------------------------------------

/// A tile as the client sends it: raw coordinates and a symbol.
///
/// Nothing here is trusted. Conversion into a [`Placement`] checks the
/// bounds and the symbol and reports anything off as
/// [`PlayError::Malformed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub row: usize,
    pub col: usize,
    pub letter: char,
}

impl PlacedTile {
    pub fn new(row: usize, col: usize, letter: char) -> Self {
        Self { row, col, letter }
    }
}

impl TryFrom<PlacedTile> for Placement {
    type Error = PlayError;

    fn try_from(tile: PlacedTile) -> Result<Self, Self::Error> {
        let position = Position::new(tile.row, tile.col).ok_or_else(|| {
            PlayError::Malformed(format!("({}, {}) is off the board", tile.row, tile.col))
        })?;
        let letter = Letter::new(tile.letter)
            .ok_or_else(|| PlayError::Malformed(format!("'{}' is not a tile", tile.letter)))?;
        Ok(Placement::new(position, letter))
    }
}

impl From<Placement> for PlacedTile {
    fn from(placement: Placement) -> Self {
        Self {
            row: placement.position.row(),
            col: placement.position.col(),
            letter: placement.letter.as_char(),
        }
    }
}

/// Converts a whole play, failing on the first malformed tile.
pub fn placements_from_wire(tiles: &[PlacedTile]) -> Result<Vec<Placement>, PlayError> {
    tiles.iter().map(|t| Placement::try_from(*t)).collect()
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One roster entry as every player sees it. Rack contents are private,
/// so only the tile count is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub ready: bool,
    pub score: u32,
    pub rack_size: usize,
}

/// A final score line, sent when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// The room as one particular player is allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub code: RoomCode,
    pub phase: RoomPhase,
    pub variant: Variant,
    pub board: Board,
    /// Roster in join order.
    pub players: Vec<PlayerView>,
    pub turn: Option<PlayerId>,
    /// Winner of the previous game, if one has finished.
    pub winner: Option<PlayerId>,
    pub words_created: Vec<String>,
    pub remaining_tiles: u32,
    /// The viewer's own rack.
    pub rack: Vec<Tile>,
}
